//! Canonicalizer.
//!
//! Rewrites math-like text into the strict form the evaluator runs:
//! - text cleanup (BOM, line endings, tabs, case, repeated whitespace)
//! - `log(x)` -> `log10(x)`; `log(x, base)` and `ln(x)` are left alone
//! - `x deg` -> `x * pi / 180`, `x rad` -> `x`
//! - in DEG mode, trig arguments without an explicit unit are read as degrees
//!
//! Every rewrite is applied to the parse tree, keyed on callee and argument count.

use crate::error::{CalcError, CalcResult};
use crate::lexer::{tokenize, AngleUnit, Constant, Function};
use crate::parser::{parse, BinaryOperator, Expr};
use crate::types::{AngleMode, CanonicalExpression};

/* ───────────────────── Preprocessing ───────────────────── */

pub fn normalize_text(input: &str) -> String {
    // 1) Remove BOM if present
    let s = input.strip_prefix('\u{feff}').unwrap_or(input);
    // 2) Lowercase, then collapse CR/LF/tabs/runs of spaces into single spaces
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/* ───────────────────── Tree rewriting ───────────────────── */

pub fn canonicalize_tree(expr: Expr, mode: AngleMode) -> Expr {
    match expr {
        Expr::Number(_) | Expr::Constant(_) | Expr::FunctionRef(_) => expr,

        Expr::Call(func, args) => {
            // Decide on the original argument, before units are lowered away.
            let read_as_degrees = mode == AngleMode::Deg
                && func.is_trig()
                && args.first().is_some_and(|arg| !arg.has_unit());

            let mut args: Vec<Expr> = args
                .into_iter()
                .map(|arg| canonicalize_tree(arg, mode))
                .collect();

            if read_as_degrees {
                args = args.into_iter().map(degrees_to_radians).collect();
            }

            match (func, args.len()) {
                (Function::Log, 1) => Expr::Call(Function::Log10, args),
                _ => Expr::Call(func, args),
            }
        }

        Expr::Neg(inner) => Expr::Neg(Box::new(canonicalize_tree(*inner, mode))),

        Expr::BinaryOp(lhs, op, rhs) => Expr::binary(
            canonicalize_tree(*lhs, mode),
            op,
            canonicalize_tree(*rhs, mode),
        ),

        Expr::Unit(inner, AngleUnit::Deg) => degrees_to_radians(canonicalize_tree(*inner, mode)),
        Expr::Unit(inner, AngleUnit::Rad) => canonicalize_tree(*inner, mode),
    }
}

fn degrees_to_radians(expr: Expr) -> Expr {
    Expr::binary(
        Expr::binary(expr, BinaryOperator::Mul, Expr::Constant(Constant::Pi)),
        BinaryOperator::Div,
        Expr::Number(180.0),
    )
}

/* ───────────────────── Entry points ───────────────────── */

/// Tokenize (the full-string grammar gate), parse and rewrite.
pub fn canonical_tree(input: &str, mode: AngleMode) -> CalcResult<Expr> {
    let text = normalize_text(input);
    if text.is_empty() {
        return Err(CalcError::EmptyInput);
    }
    let tokens = tokenize(&text)?;
    let ast = parse(tokens)?;
    Ok(canonicalize_tree(ast, mode))
}

pub fn canonicalize(input: &str, mode: AngleMode) -> CalcResult<CanonicalExpression> {
    let tree = canonical_tree(input, mode)?;
    Ok(CanonicalExpression::new(tree.to_string()))
}

#[cfg(test)]
mod tests;
