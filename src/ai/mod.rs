//! Remote normalizer: natural-language text -> strict expression via a chat-completion service.

pub mod config;
pub mod normalizer;

pub use config::NormalizerConfig;
pub use normalizer::{extract_expression, Normalize, RemoteNormalizer, SYSTEM_PROMPT};
