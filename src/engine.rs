use std::sync::Arc;

use tracing::{debug, warn};

use crate::ai::{Normalize, NormalizerConfig, RemoteNormalizer};
use crate::canon::canonical_tree;
use crate::classify::is_confidently_strict;
use crate::error::{CalcError, CalcResult};
use crate::eval::{Evaluated, Evaluator};
use crate::strip::strip_english;
use crate::types::{
    AngleMode, CanonicalExpression, EvaluationResult, NormalizationRequest, RawInput,
};

/* ───────────────────── Outcomes ───────────────────── */

/// Which step of the pipeline produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Input already passed the classifier gate.
    Local,
    /// Input passed the gate after filler phrases were removed.
    Stripped,
    /// Expression came back from the remote normalizer.
    Remote,
    /// Local-only fallback: evaluated as typed, without the gate.
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    Full,
    LocalOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Success {
    pub result: EvaluationResult,
    pub canonical: CanonicalExpression,
    pub stage: Stage,
    /// Text the pipeline derived from the input, when it is not the input itself.
    pub normalized: Option<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error}")]
pub struct Failure {
    pub error: CalcError,
    pub normalized: Option<String>,
}

impl Failure {
    fn new(error: CalcError, normalized: Option<String>) -> Self {
        Self { error, normalized }
    }
}

impl From<CalcError> for Failure {
    fn from(error: CalcError) -> Self {
        Self::new(error, None)
    }
}

/* ───────────────────── Pipeline ───────────────────── */

#[derive(Clone)]
pub struct Pipeline {
    evaluator: Evaluator,
    normalizer: Option<Arc<dyn Normalize>>,
}

impl Pipeline {
    pub fn local_only() -> Self {
        Self {
            evaluator: Evaluator::default(),
            normalizer: None,
        }
    }

    pub fn with_normalizer(normalizer: Arc<dyn Normalize>) -> Self {
        Self {
            evaluator: Evaluator::default(),
            normalizer: Some(normalizer),
        }
    }

    /// Remote-backed pipeline when `NATMATH_AI_*` is usable, local-only otherwise.
    pub fn from_env(force_local: bool) -> Self {
        if force_local {
            return Self::local_only();
        }
        match NormalizerConfig::from_env().and_then(RemoteNormalizer::new) {
            Ok(remote) => Self::with_normalizer(Arc::new(remote)),
            Err(e) => {
                warn!("remote normalizer disabled, running local-only: {e}");
                Self::local_only()
            }
        }
    }

    pub fn mode(&self) -> PipelineMode {
        if self.normalizer.is_some() {
            PipelineMode::Full
        } else {
            PipelineMode::LocalOnly
        }
    }

    /// Local strict path -> stripped-text path -> remote normalizer,
    /// stopping at the first success.
    pub async fn run(&self, input: &RawInput) -> Result<Success, Failure> {
        let text = input.text();
        let mode = input.angle_mode();
        let mut last_failure: Option<Failure> = None;

        if is_confidently_strict(text) {
            match self.evaluate(text, mode) {
                Ok(done) => return Ok(success(done, Stage::Local, None)),
                Err(e) => {
                    debug!(input = text, "local evaluation failed: {e}");
                    last_failure = Some(Failure::new(e, None));
                }
            }
        }

        let stripped = strip_english(text);
        if stripped != text && is_confidently_strict(&stripped) {
            match self.evaluate(&stripped, mode) {
                Ok(done) => return Ok(success(done, Stage::Stripped, Some(stripped))),
                Err(e) => {
                    debug!(stripped = %stripped, "stripped evaluation failed: {e}");
                    last_failure = Some(Failure::new(e, Some(stripped)));
                }
            }
        }

        let Some(normalizer) = &self.normalizer else {
            if let Some(failure) = last_failure {
                return Err(failure);
            }
            return self
                .evaluate(text, mode)
                .map(|done| success(done, Stage::Direct, None))
                .map_err(Failure::from);
        };

        let expression = match self.normalize(normalizer.as_ref(), input).await {
            Ok(expression) => expression,
            Err(e) => {
                warn!(input = text, "remote normalization failed: {e}");
                // An evaluator error from an earlier stage says more than "could not normalize".
                return Err(last_failure.unwrap_or_else(|| Failure::new(e, None)));
            }
        };

        match self.evaluate(&expression, mode) {
            Ok(done) => Ok(success(done, Stage::Remote, Some(expression))),
            Err(e) => {
                debug!(expression = %expression, "normalized evaluation failed: {e}");
                Err(Failure::new(e, Some(expression)))
            }
        }
    }

    fn evaluate(&self, text: &str, mode: AngleMode) -> CalcResult<Evaluated> {
        self.evaluator.evaluate(text, mode)
    }

    /// One remote call; the answer must still be a computation, not a number.
    async fn normalize(&self, normalizer: &dyn Normalize, input: &RawInput) -> CalcResult<String> {
        let expression = normalizer
            .normalize(&NormalizationRequest::from(input))
            .await?;
        if expression.trim().is_empty() {
            return Err(CalcError::NormalizationFailed(
                "normalizer returned an empty expression".into(),
            ));
        }
        // Unparseable answers fall through so the evaluator reports the real error.
        if let Ok(tree) = canonical_tree(&expression, input.angle_mode()) {
            if !tree.is_computation() {
                return Err(CalcError::NormalizationFailed(format!(
                    "normalizer returned the value '{expression}' instead of an expression"
                )));
            }
        }
        Ok(expression)
    }
}

fn success(done: Evaluated, stage: Stage, normalized: Option<String>) -> Success {
    Success {
        result: done.result,
        canonical: done.canonical,
        stage,
        normalized,
    }
}

/* ───────────────────── Local-only entry point ───────────────────── */

/// Canonicalize and evaluate `expression` as typed, with no classifier gate
/// and no network.
pub fn evaluate_local(expression: &str, angle_mode: AngleMode) -> CalcResult<EvaluationResult> {
    crate::eval::evaluate(expression, angle_mode)
}
