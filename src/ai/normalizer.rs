//! Chat-completion client that turns natural-language math into a strict expression.
//!
//! The service is only ever asked to *rewrite* the text; the returned
//! expression goes back through the strict evaluator like any other input.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};

use super::config::NormalizerConfig;
use crate::error::{CalcError, CalcResult};
use crate::types::{NormalizationRequest, NormalizationResponse};

pub const SYSTEM_PROMPT: &str = r#"You convert natural-language math into a single strict arithmetic expression.
Reply with JSON only, exactly of the form {"expression": "<expression>"}.
Allowed vocabulary: numbers, decimal points, the constants pi and e,
the functions sin cos tan log log10 ln exp sqrt, the operators + - * / ^,
parentheses, commas (only in log(x, base)), and the unit words deg and rad.
log(x) means base 10, ln(x) is the natural logarithm, log(x, b) is log base b.
If the user talks about degrees, write the unit explicitly, e.g. sin(30 deg).
Spell out the computation the user asked for. Never evaluate, simplify or
answer it: "five plus five" must become "5 + 5", never "10".
If the text is not a math request, reply {"expression": ""}."#;

/// Text -> expression conversion. Implementations must not compute results.
#[async_trait]
pub trait Normalize: Send + Sync {
    async fn normalize(&self, request: &NormalizationRequest) -> CalcResult<String>;
}

#[derive(Debug, Clone)]
pub struct RemoteNormalizer {
    client: Client,
    config: NormalizerConfig,
}

impl RemoteNormalizer {
    pub fn new(config: NormalizerConfig) -> CalcResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CalcError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn payload(&self, request: &NormalizationRequest) -> Value {
        json!({
            "model": self.config.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!("Angle mode: {}\nText: {}", request.angle_mode, request.text)
                }
            ]
        })
    }
}

#[async_trait]
impl Normalize for RemoteNormalizer {
    async fn normalize(&self, request: &NormalizationRequest) -> CalcResult<String> {
        tracing::debug!(model = %self.config.model, text = %request.text, "remote normalization");

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.payload(request))
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("service timed out after {:?}", self.config.timeout)
                } else {
                    format!("request failed: {e}")
                };
                CalcError::NormalizationFailed(reason)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CalcError::NormalizationFailed(format!(
                "service returned {status}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CalcError::NormalizationFailed(format!("unreadable response: {e}")))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                CalcError::NormalizationFailed("response has no message content".into())
            })?;

        extract_expression(content)
    }
}

/* ───────────────────── Response parsing ───────────────────── */

static FENCE_RE: OnceLock<Regex> = OnceLock::new();
static BACKTICK_RE: OnceLock<Regex> = OnceLock::new();
static QUOTED_RE: OnceLock<Regex> = OnceLock::new();

fn fence_re() -> &'static Regex {
    FENCE_RE.get_or_init(|| Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("fence regex"))
}

fn backtick_re() -> &'static Regex {
    BACKTICK_RE.get_or_init(|| Regex::new(r"`([^`]+)`").expect("backtick regex"))
}

fn quoted_re() -> &'static Regex {
    QUOTED_RE.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("quoted regex"))
}

/// Pull the expression out of the model's reply.
///
/// JSON replies must have the `{ "expression": string }` shape. Replies that
/// are not JSON at all fall back to the first back-ticked, then double-quoted, fragment.
pub fn extract_expression(content: &str) -> CalcResult<String> {
    let trimmed = content.trim();
    let trimmed = fence_re()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    let expression = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => serde_json::from_value::<NormalizationResponse>(value)
            .map(|resp| resp.expression)
            .map_err(|e| CalcError::NormalizationFailed(format!("unexpected response shape: {e}")))?,
        Err(_) => quoted_fragment(trimmed).ok_or_else(|| {
            CalcError::NormalizationFailed("no expression found in response".into())
        })?,
    };

    let expression = expression.trim();
    if expression.is_empty() {
        return Err(CalcError::NormalizationFailed(
            "service returned an empty expression".into(),
        ));
    }
    Ok(expression.to_string())
}

fn quoted_fragment(text: &str) -> Option<String> {
    backtick_re()
        .captures(text)
        .or_else(|| quoted_re().captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
