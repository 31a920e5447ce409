//! Request-scoped values that flow through the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// How trig arguments without an explicit unit are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    #[serde(rename = "RAD", alias = "rad")]
    Rad,
    #[serde(rename = "DEG", alias = "deg")]
    Deg,
}

impl AngleMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AngleMode::Rad => "RAD",
            AngleMode::Deg => "DEG",
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trimmed, non-empty user text plus the angle mode it was entered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    text: String,
    angle_mode: AngleMode,
}

impl RawInput {
    pub fn new(text: &str, angle_mode: AngleMode) -> CalcResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CalcError::EmptyInput);
        }
        Ok(Self {
            text: text.to_string(),
            angle_mode,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }
}

/// A string in the strict grammar. Only the canonicalizer builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalExpression(String);

impl CanonicalExpression {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final value handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvaluationResult {
    Numeric(f64),
    Formatted(String),
}

impl EvaluationResult {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EvaluationResult::Numeric(v) => Some(*v),
            EvaluationResult::Formatted(_) => None,
        }
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationResult::Numeric(v) => write!(f, "{v}"),
            EvaluationResult::Formatted(s) => f.write_str(s),
        }
    }
}

/// What the remote normalizer is asked to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationRequest {
    pub text: String,
    #[serde(rename = "angleMode")]
    pub angle_mode: AngleMode,
}

impl From<&RawInput> for NormalizationRequest {
    fn from(input: &RawInput) -> Self {
        Self {
            text: input.text().to_string(),
            angle_mode: input.angle_mode(),
        }
    }
}

/// Required JSON shape of the remote normalizer's answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NormalizationResponse {
    pub expression: String,
}
