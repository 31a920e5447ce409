//! Error taxonomy shared by every pipeline stage.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Disallowed token '{0}'")]
    DisallowedToken(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Incomplete function call: '{0}' needs an argument list, e.g. {0}(2)")]
    IncompleteFunctionCall(String),

    #[error("Result is not a finite number")]
    NonFiniteResult,

    #[error("Unsupported result type: {0}")]
    UnsupportedResultType(String),

    #[error("Normalization failed: {0}")]
    NormalizationFailed(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CalcError {
    /// Stable snake_case name, used as the `kind` field of API errors.
    pub fn kind(&self) -> &'static str {
        match self {
            CalcError::EmptyInput => "empty_input",
            CalcError::DisallowedToken(_) => "disallowed_token",
            CalcError::ParseFailure(_) => "parse_failure",
            CalcError::IncompleteFunctionCall(_) => "incomplete_function_call",
            CalcError::NonFiniteResult => "non_finite_result",
            CalcError::UnsupportedResultType(_) => "unsupported_result_type",
            CalcError::NormalizationFailed(_) => "normalization_failed",
            CalcError::Configuration(_) => "configuration",
        }
    }
}

pub type CalcResult<T> = std::result::Result<T, CalcError>;
