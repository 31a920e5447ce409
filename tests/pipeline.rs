use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use natmath::ai::Normalize;
use natmath::engine::{PipelineMode, Stage};
use natmath::error::CalcResult;
use natmath::types::NormalizationRequest;
use natmath::{evaluate_local, AngleMode, CalcError, EvaluationResult, Pipeline, RawInput};

/// Canned normalizer that records how often it was asked.
struct Scripted {
    reply: CalcResult<String>,
    calls: AtomicUsize,
    seen_mode: std::sync::Mutex<Option<AngleMode>>,
}

impl Scripted {
    fn answering(expression: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(expression.to_string()),
            calls: AtomicUsize::new(0),
            seen_mode: std::sync::Mutex::new(None),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(CalcError::NormalizationFailed("service returned 500".into())),
            calls: AtomicUsize::new(0),
            seen_mode: std::sync::Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Normalize for Scripted {
    async fn normalize(&self, request: &NormalizationRequest) -> CalcResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_mode.lock().unwrap() = Some(request.angle_mode);
        self.reply.clone()
    }
}

fn input(text: &str) -> RawInput {
    RawInput::new(text, AngleMode::Rad).expect("non-empty input")
}

#[tokio::test]
async fn strict_input_never_reaches_the_normalizer() {
    let remote = Scripted::answering("999 + 1");
    let pipeline = Pipeline::with_normalizer(remote.clone());
    assert_eq!(pipeline.mode(), PipelineMode::Full);

    let done = pipeline.run(&input("2 + 2")).await.unwrap();
    assert_eq!(done.result, EvaluationResult::Numeric(4.0));
    assert_eq!(done.stage, Stage::Local);
    assert_eq!(done.normalized, None);
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn filler_words_are_stripped_locally() {
    let remote = Scripted::answering("999 + 1");
    let pipeline = Pipeline::with_normalizer(remote.clone());

    let done = pipeline.run(&input("what is 2 + 2?")).await.unwrap();
    assert_eq!(done.result, EvaluationResult::Numeric(4.0));
    assert_eq!(done.stage, Stage::Stripped);
    assert_eq!(done.normalized.as_deref(), Some("2 + 2"));
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn words_go_to_the_normalizer_once() {
    let remote = Scripted::answering("5 + 5");
    let pipeline = Pipeline::with_normalizer(remote.clone());

    let done = pipeline
        .run(&RawInput::new("five plus five", AngleMode::Deg).unwrap())
        .await
        .unwrap();
    assert_eq!(done.result, EvaluationResult::Numeric(10.0));
    assert_eq!(done.stage, Stage::Remote);
    assert_eq!(done.normalized.as_deref(), Some("5 + 5"));
    assert_eq!(remote.calls(), 1);
    assert_eq!(*remote.seen_mode.lock().unwrap(), Some(AngleMode::Deg));
}

#[tokio::test]
async fn remote_expression_is_evaluated_in_the_requested_mode() {
    let remote = Scripted::answering("sin(30)");
    let pipeline = Pipeline::with_normalizer(remote);

    let done = pipeline
        .run(&RawInput::new("sine of thirty", AngleMode::Deg).unwrap())
        .await
        .unwrap();
    assert_eq!(done.result, EvaluationResult::Numeric(0.5));
}

#[tokio::test]
async fn bare_number_from_normalizer_is_rejected() {
    let remote = Scripted::answering("5");
    let pipeline = Pipeline::with_normalizer(remote.clone());

    let failure = pipeline.run(&input("five")).await.unwrap_err();
    assert!(matches!(failure.error, CalcError::NormalizationFailed(_)));
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn signed_and_exponent_literals_count_as_answers() {
    for reply in ["+10", "1e+1", "-5", "pi"] {
        let remote = Scripted::answering(reply);
        let pipeline = Pipeline::with_normalizer(remote.clone());

        let failure = pipeline.run(&input("five plus five")).await.unwrap_err();
        assert!(
            matches!(failure.error, CalcError::NormalizationFailed(_)),
            "{reply:?} was accepted: {failure:?}"
        );
        assert_eq!(remote.calls(), 1);
    }
}

#[tokio::test]
async fn unit_conversion_from_normalizer_is_a_computation() {
    let pipeline = Pipeline::with_normalizer(Scripted::answering("180 deg"));

    let done = pipeline.run(&input("half a turn in radians")).await.unwrap();
    let value = done.result.as_f64().expect("numeric result");
    assert!((value - std::f64::consts::PI).abs() < 1e-12);
    assert_eq!(done.stage, Stage::Remote);
}

#[tokio::test]
async fn unparseable_normalizer_reply_reports_the_evaluator_error() {
    let pipeline = Pipeline::with_normalizer(Scripted::answering("ten plus ten"));

    let failure = pipeline.run(&input("ten plus ten")).await.unwrap_err();
    assert!(matches!(failure.error, CalcError::DisallowedToken(_)));
    assert_eq!(failure.normalized.as_deref(), Some("ten plus ten"));
}

#[tokio::test]
async fn normalizer_error_surfaces_as_normalization_failure() {
    let pipeline = Pipeline::with_normalizer(Scripted::failing());

    let failure = pipeline.run(&input("twelve squared")).await.unwrap_err();
    assert!(matches!(failure.error, CalcError::NormalizationFailed(_)));
    assert_eq!(failure.normalized, None);
}

#[tokio::test]
async fn evaluator_error_after_normalization_keeps_the_expression() {
    let pipeline = Pipeline::with_normalizer(Scripted::answering("sqrt(-4)"));

    let failure = pipeline.run(&input("sqrt(-4)")).await.unwrap_err();
    assert!(matches!(failure.error, CalcError::UnsupportedResultType(_)));
    assert_eq!(failure.normalized.as_deref(), Some("sqrt(-4)"));
}

#[tokio::test]
async fn earlier_evaluator_error_wins_over_normalizer_failure() {
    let remote = Scripted::failing();
    let pipeline = Pipeline::with_normalizer(remote.clone());

    let failure = pipeline.run(&input("1/0")).await.unwrap_err();
    assert_eq!(failure.error, CalcError::NonFiniteResult);
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn local_only_pipeline_evaluates_directly() {
    let pipeline = Pipeline::local_only();
    assert_eq!(pipeline.mode(), PipelineMode::LocalOnly);

    let failure = pipeline.run(&input("hello world")).await.unwrap_err();
    assert!(matches!(failure.error, CalcError::DisallowedToken(_)));

    let done = pipeline.run(&input("log(100)")).await.unwrap();
    assert_eq!(done.result, EvaluationResult::Numeric(2.0));
    assert_eq!(done.canonical.as_str(), "log10(100)");
}

#[tokio::test]
async fn local_only_reports_incomplete_calls() {
    let failure = Pipeline::local_only()
        .run(&input("log10"))
        .await
        .unwrap_err();
    assert!(matches!(failure.error, CalcError::IncompleteFunctionCall(_)));
    assert_eq!(failure.error.kind(), "incomplete_function_call");
}

#[test]
fn evaluate_local_skips_the_gate() {
    assert_eq!(
        evaluate_local("2pi / pi", AngleMode::Rad).unwrap(),
        EvaluationResult::Numeric(2.0)
    );
    assert_eq!(
        evaluate_local("cos(60)", AngleMode::Deg).unwrap(),
        EvaluationResult::Numeric(0.5)
    );
    assert_eq!(
        evaluate_local("   ", AngleMode::Rad).unwrap_err(),
        CalcError::EmptyInput
    );
}
