//! Classifier gate.
//!
//! Decides whether a string already looks like strict math:
//! 1. after removing the known function/unit/constant words, only digits,
//!    operators, parentheses, dots, commas and whitespace remain;
//! 2. it contains at least one operator or function call;
//! 3. it contains at least one digit or named constant.

use std::sync::OnceLock;

use regex::Regex;

static VOCABULARY_RE: OnceLock<Regex> = OnceLock::new();
static REMAINDER_RE: OnceLock<Regex> = OnceLock::new();
static OP_OR_FUNC_RE: OnceLock<Regex> = OnceLock::new();
static DIGIT_OR_CONST_RE: OnceLock<Regex> = OnceLock::new();

// Longest alternatives first so `log10` is not eaten as `log` + `10`.
fn vocabulary_re() -> &'static Regex {
    VOCABULARY_RE.get_or_init(|| {
        Regex::new(r"(?i)log10|log|ln|sin|cos|tan|exp|sqrt|pi|deg|rad|e").expect("vocabulary regex")
    })
}

fn remainder_re() -> &'static Regex {
    REMAINDER_RE.get_or_init(|| Regex::new(r"^[\s0-9+\-*/^().,eE]+$").expect("remainder regex"))
}

fn op_or_func_re() -> &'static Regex {
    OP_OR_FUNC_RE.get_or_init(|| {
        Regex::new(r"(?i)[+\-*/^]|\b(?:log10|log|ln|sin|cos|tan|exp|sqrt)\s*\(")
            .expect("operator regex")
    })
}

fn digit_or_const_re() -> &'static Regex {
    DIGIT_OR_CONST_RE.get_or_init(|| Regex::new(r"(?i)\d|\bpi\b|\be\b").expect("constant regex"))
}

/// Character/word allow-list test only (part 1 of the gate).
pub fn is_likely_math(input: &str) -> bool {
    let remainder = vocabulary_re().replace_all(input, "");
    remainder_re().is_match(&remainder)
}

pub fn has_op_or_func(input: &str) -> bool {
    op_or_func_re().is_match(input)
}

pub fn has_digit_or_const(input: &str) -> bool {
    digit_or_const_re().is_match(input)
}

/// The full three-part classifier gate.
pub fn is_confidently_strict(input: &str) -> bool {
    is_likely_math(input) && has_op_or_func(input) && has_digit_or_const(input)
}

#[cfg(test)]
mod tests;
