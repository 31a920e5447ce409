pub mod ai;
pub mod banner;
pub mod canon;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod history;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod strip;
pub mod types;

pub use engine::{evaluate_local, Pipeline};
pub use error::CalcError;
pub use lexer::tokenize;
pub use parser::parse;
pub use types::{AngleMode, CanonicalExpression, EvaluationResult, RawInput};
