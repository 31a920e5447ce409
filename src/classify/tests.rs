use super::*;

#[test]
fn accepts_plain_and_function_expressions() {
    for src in [
        "2 + 2",
        "(1.5 * 4) / 3",
        "sin(30)",
        "SQRT(16)",
        "log10(1000)",
        "log(100, 2)",
        "ln(e)",
        "2^3^2",
        "30 deg * 2",
        "pi / 2",
    ] {
        assert!(is_confidently_strict(src), "{src:?} should pass the gate");
    }
}

#[test]
fn rejects_bare_words_and_punctuation() {
    for src in ["e", "pi", "--", "()", "hello", "what is 2 + 2", "five plus five", "sinus(2)"] {
        assert!(!is_confidently_strict(src), "{src:?} should fail the gate");
    }
}

#[test]
fn gate_parts_are_independent() {
    // Allowed characters, but nothing to compute.
    assert!(is_likely_math("42"));
    assert!(!has_op_or_func("42"));

    // An operator and a constant, no digits.
    assert!(has_op_or_func("e * pi"));
    assert!(has_digit_or_const("e * pi"));

    // Function word without a call.
    assert!(!has_op_or_func("log10"));
    assert!(has_op_or_func("log10 (5)"));
}

#[test]
fn letters_outside_the_vocabulary_fail_the_allow_list() {
    assert!(!is_likely_math("2 + x"));
    assert!(!is_likely_math("2 % 3"));
    assert!(is_likely_math("2E5 + 1"));
}
