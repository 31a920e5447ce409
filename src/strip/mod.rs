//! English stripper.
//!
//! Deletes known filler phrasing ("what is", "calculate", ...) so simple
//! questions like `what is 2 + 2?` can be evaluated without a remote call.
//! Only removes words; it never adds or changes numbers, operators or function names.

use std::sync::OnceLock;

use regex::Regex;

static FILLER_RE: OnceLock<Regex> = OnceLock::new();

fn filler_re() -> &'static Regex {
    FILLER_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:what\s+is|what's|whats|calculate|compute|please|solve|evaluate|the\s+value\s+of)\b",
        )
        .expect("filler regex")
    })
}

pub fn strip_english(input: &str) -> String {
    let without_filler = filler_re().replace_all(input, " ");
    let collapsed = without_filler.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['?', '=', '!'])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::strip_english;
    use crate::classify::is_confidently_strict;

    #[test]
    fn removes_lead_in_phrases() {
        assert_eq!(strip_english("what is 2 + 2"), "2 + 2");
        assert_eq!(strip_english("What's 2*3?"), "2*3");
        assert_eq!(strip_english("please calculate sqrt(16)"), "sqrt(16)");
        assert_eq!(strip_english("Evaluate the value of  log(100) ="), "log(100)");
        assert_eq!(strip_english("solve 3^2"), "3^2");
    }

    #[test]
    fn leaves_math_tokens_alone() {
        assert_eq!(strip_english("sin(30) + ln(e)"), "sin(30) + ln(e)");
        assert_eq!(strip_english("2 + 2"), "2 + 2");
    }

    #[test]
    fn does_not_invent_values() {
        let stripped = strip_english("what is five plus five");
        assert_eq!(stripped, "five plus five");
        assert!(!is_confidently_strict(&stripped));
    }

    #[test]
    fn stripped_questions_pass_the_gate() {
        assert!(is_confidently_strict(&strip_english("what is 2 + 2?")));
        assert!(!is_confidently_strict("what is 2 + 2?"));
    }
}
