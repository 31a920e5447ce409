//! Unit tests for the strict-grammar lexer.

use super::{tokenize, AngleUnit, Constant, Function, Token};
use crate::error::CalcError;

#[test]
fn tokenizes_function_call_with_two_args() {
    let toks = tokenize("log(100, 2)").unwrap();
    assert_eq!(
        toks,
        vec![
            Token::Function(Function::Log),
            Token::LParen,
            Token::Number(100.0),
            Token::Comma,
            Token::Number(2.0),
            Token::RParen,
        ]
    );
}

#[test]
fn words_are_case_insensitive() {
    let toks = tokenize("SIN(PI) + Log10(E)").unwrap();
    assert_eq!(toks[0], Token::Function(Function::Sin));
    assert_eq!(toks[2], Token::Constant(Constant::Pi));
    assert_eq!(toks[5], Token::Function(Function::Log10));
    assert_eq!(toks[7], Token::Constant(Constant::E));
}

#[test]
fn tokenizes_unit_words() {
    let toks = tokenize("30 deg + 1 rad").unwrap();
    assert_eq!(
        toks,
        vec![
            Token::Number(30.0),
            Token::Unit(AngleUnit::Deg),
            Token::Plus,
            Token::Number(1.0),
            Token::Unit(AngleUnit::Rad),
        ]
    );
}

#[test]
fn reads_decimals_and_exponents() {
    assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
    assert_eq!(tokenize("2.25").unwrap(), vec![Token::Number(2.25)]);
    assert_eq!(tokenize("2e-3").unwrap(), vec![Token::Number(0.002)]);
    assert_eq!(tokenize("1E3").unwrap(), vec![Token::Number(1000.0)]);
}

#[test]
fn trailing_e_without_digits_is_the_constant() {
    assert_eq!(
        tokenize("2e").unwrap(),
        vec![Token::Number(2.0), Token::Constant(Constant::E)]
    );
    assert_eq!(
        tokenize("2exp(1)").unwrap()[1],
        Token::Function(Function::Exp)
    );
}

#[test]
fn rejects_unknown_words_and_symbols() {
    assert_eq!(
        tokenize("2 + x"),
        Err(CalcError::DisallowedToken("x".into()))
    );
    assert_eq!(
        tokenize("hello"),
        Err(CalcError::DisallowedToken("hello".into()))
    );
    assert_eq!(tokenize("3 % 2"), Err(CalcError::DisallowedToken("%".into())));
    assert!(matches!(
        tokenize("pie * 2"),
        Err(CalcError::DisallowedToken(_))
    ));
}

#[test]
fn lone_decimal_point_is_a_parse_failure() {
    assert_eq!(
        tokenize("2 + ."),
        Err(CalcError::ParseFailure("malformed number '.'".into()))
    );
}

#[test]
fn overflowing_literals_are_rejected() {
    assert!(matches!(tokenize("1e999"), Err(CalcError::ParseFailure(_))));
    assert!(matches!(tokenize("1/1E400"), Err(CalcError::ParseFailure(_))));
    assert_eq!(tokenize("1e308").unwrap(), vec![Token::Number(1e308)]);
}
