//! Lexer.
//!
//! Tokenizes strict math expressions against a closed vocabulary:
//! - Numbers (`12`, `0.5`, `.5`, `2e-3`)
//! - Constants `pi`, `e`
//! - Functions `sin cos tan log log10 ln exp sqrt`
//! - Operators `+ - * / ^`, parentheses, comma
//! - Postfix unit words `deg`, `rad`
//!
//! Anything else is rejected with [`CalcError::DisallowedToken`] before parsing starts.

use std::fmt;

use crate::error::{CalcError, CalcResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Log,
    Log10,
    Ln,
    Exp,
    Sqrt,
}

impl Function {
    pub fn from_name(word: &str) -> Option<Self> {
        Some(match word {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "log" => Function::Log,
            "log10" => Function::Log10,
            "ln" => Function::Ln,
            "exp" => Function::Exp,
            "sqrt" => Function::Sqrt,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Ln => "ln",
            Function::Exp => "exp",
            Function::Sqrt => "sqrt",
        }
    }

    /// `log` takes an optional base; everything else is unary.
    pub fn accepts(self, argc: usize) -> bool {
        match self {
            Function::Log => argc == 1 || argc == 2,
            _ => argc == 1,
        }
    }

    pub fn is_trig(self) -> bool {
        matches!(self, Function::Sin | Function::Cos | Function::Tan)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Deg,
    Rad,
}

impl AngleUnit {
    pub fn name(self) -> &'static str {
        match self {
            AngleUnit::Deg => "deg",
            AngleUnit::Rad => "rad",
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Number(f64),
    Constant(Constant),
    Function(Function),
    Unit(AngleUnit),

    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Comma,

    LParen,
    RParen,
}

pub fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }

            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i < chars.len() && chars[i] == '.' {
                    i += 1; // consume '.'
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                i = scan_exponent(&chars, i);

                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::ParseFailure(format!("malformed number '{literal}'")))?;
                if !value.is_finite() {
                    return Err(CalcError::ParseFailure(format!(
                        "number '{literal}' is out of range"
                    )));
                }
                tokens.push(Token::Number(value));
            }

            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(word_token(&word.to_ascii_lowercase())?);
            }

            c if c.is_whitespace() => {
                i += 1;
            }

            other => return Err(CalcError::DisallowedToken(other.to_string())),
        }
    }

    tracing::trace!(?tokens, "tokenized");
    Ok(tokens)
}

/// Consume an `e`/`E` exponent suffix only when digits follow it, so `2e` stays `2 * e`.
fn scan_exponent(chars: &[char], mut i: usize) -> usize {
    if i >= chars.len() || !matches!(chars[i], 'e' | 'E') {
        return i;
    }
    let mut j = i + 1;
    if j < chars.len() && matches!(chars[j], '+' | '-') {
        j += 1;
    }
    if j < chars.len() && chars[j].is_ascii_digit() {
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        i = j;
    }
    i
}

fn word_token(word: &str) -> CalcResult<Token> {
    if let Some(func) = Function::from_name(word) {
        return Ok(Token::Function(func));
    }
    match word {
        "pi" => Ok(Token::Constant(Constant::Pi)),
        "e" => Ok(Token::Constant(Constant::E)),
        "deg" => Ok(Token::Unit(AngleUnit::Deg)),
        "rad" => Ok(Token::Unit(AngleUnit::Rad)),
        _ => Err(CalcError::DisallowedToken(word.to_string())),
    }
}

#[cfg(test)]
mod tests;
