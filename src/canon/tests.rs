use super::*;
use crate::error::CalcError;

fn canon(src: &str, mode: AngleMode) -> String {
    canonicalize(src, mode).unwrap().into_string()
}

#[test]
fn single_argument_log_becomes_base_ten() {
    assert_eq!(canon("log(100)", AngleMode::Rad), "log10(100)");
    assert_eq!(canon("LOG( 100 )", AngleMode::Rad), "log10(100)");
}

#[test]
fn explicit_base_log_and_ln_are_untouched() {
    assert_eq!(canon("log(100, 2)", AngleMode::Rad), "log(100, 2)");
    assert_eq!(canon("ln(e)", AngleMode::Rad), "ln(e)");
}

#[test]
fn nested_and_adjacent_logs_are_rewritten_by_arity() {
    assert_eq!(
        canon("ln(log(1000)) + log(log(8, 2), 3)", AngleMode::Rad),
        "ln(log10(1000)) + log(log(8, 2), 3)"
    );
    assert_eq!(canon("log(ln(e))", AngleMode::Rad), "log10(ln(e))");
}

#[test]
fn unit_literals_are_lowered() {
    assert_eq!(canon("90 deg", AngleMode::Rad), "90 * pi / 180");
    assert_eq!(canon("2 rad + 1", AngleMode::Rad), "2 + 1");
    assert_eq!(canon("(1 + 2) deg", AngleMode::Rad), "(1 + 2) * pi / 180");
}

#[test]
fn degree_mode_wraps_bare_trig_arguments() {
    assert_eq!(canon("sin(30)", AngleMode::Deg), "sin(30 * pi / 180)");
    assert_eq!(canon("cos(60) + tan(45)", AngleMode::Deg), "cos(60 * pi / 180) + tan(45 * pi / 180)");
    // Radian mode leaves them alone.
    assert_eq!(canon("sin(30)", AngleMode::Rad), "sin(30)");
}

#[test]
fn degree_mode_respects_explicit_units() {
    assert_eq!(canon("sin(30 deg)", AngleMode::Deg), "sin(30 * pi / 180)");
    assert_eq!(canon("sin(pi / 2 rad)", AngleMode::Deg), "sin(pi / 2)");
}

#[test]
fn degree_mode_only_touches_trig() {
    assert_eq!(canon("sqrt(16) + exp(0)", AngleMode::Deg), "sqrt(16) + exp(0)");
}

#[test]
fn canonicalization_is_idempotent_without_calls() {
    for src in ["2 + 3*4", "(1+2)^2^3", "-4 / -2", "1.5e3 - .5", "2 pi", "30 deg + 1"] {
        let once = canon(src, AngleMode::Deg);
        let twice = canon(&once, AngleMode::Deg);
        assert_eq!(once, twice, "not idempotent for {src:?}");
    }
}

#[test]
fn text_normalization_collapses_whitespace_and_case() {
    assert_eq!(normalize_text("\u{feff}  SIN(30)\r\n\t+  1 "), "sin(30) + 1");
}

#[test]
fn gate_runs_before_parsing() {
    assert_eq!(
        canonicalize("2 + foo(", AngleMode::Rad),
        Err(CalcError::DisallowedToken("foo".into()))
    );
}
