//! Strict evaluator.
//!
//! Single entry point used by every pipeline stage: grammar gate, parse,
//! canonicalize, evaluate, then the result guards (callable, finiteness,
//! rounding, non-real detection).

use crate::canon::canonical_tree;
use crate::error::{CalcError, CalcResult};
use crate::lexer::{AngleUnit, Function};
use crate::parser::{BinaryOperator, Expr};
use crate::types::{AngleMode, CanonicalExpression, EvaluationResult};

/// Decimal places kept when rounding away floating-point noise.
pub const ROUND_DECIMALS: usize = 14;

/// Magnitudes at or above this are rendered in exponent notation.
pub const EXPONENT_THRESHOLD: f64 = 1e21;

/// Value of a (sub)expression before the result guards run.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Real(f64),
    Function(Function),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub canonical: CanonicalExpression,
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    round: bool,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self { round: true }
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep full `f64` precision instead of rounding to [`ROUND_DECIMALS`].
    pub fn without_rounding() -> Self {
        Self { round: false }
    }

    pub fn evaluate(&self, input: &str, mode: AngleMode) -> CalcResult<Evaluated> {
        let tree = canonical_tree(input, mode)?;
        let canonical = CanonicalExpression::new(tree.to_string());
        let value = eval_node(&tree)?;
        let result = self.finish(value)?;
        tracing::debug!(%canonical, %result, "evaluated");
        Ok(Evaluated { canonical, result })
    }

    fn finish(&self, value: Value) -> CalcResult<EvaluationResult> {
        let x = match value {
            Value::Function(func) => {
                return Err(CalcError::IncompleteFunctionCall(func.name().into()))
            }
            Value::Real(x) => x,
        };
        if !x.is_finite() {
            return Err(CalcError::NonFiniteResult);
        }
        if x.abs() >= EXPONENT_THRESHOLD {
            return Ok(EvaluationResult::Formatted(format!("{x:e}")));
        }
        let x = if self.round { round_decimals(x) } else { x };
        Ok(EvaluationResult::Numeric(x))
    }
}

/// Convenience wrapper around the default [`Evaluator`].
pub fn evaluate(input: &str, mode: AngleMode) -> CalcResult<EvaluationResult> {
    Evaluator::default()
        .evaluate(input, mode)
        .map(|evaluated| evaluated.result)
}

/* ───────────────────── Tree walk ───────────────────── */

fn eval_node(expr: &Expr) -> CalcResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Real(*n)),
        Expr::Constant(c) => Ok(Value::Real(c.value())),
        Expr::FunctionRef(func) => Ok(Value::Function(*func)),

        Expr::Call(func, args) => {
            let mut xs = Vec::with_capacity(args.len());
            for arg in args {
                xs.push(real(eval_node(arg)?)?);
            }
            apply(*func, &xs).map(Value::Real)
        }

        Expr::Neg(inner) => Ok(Value::Real(-real(eval_node(inner)?)?)),

        Expr::BinaryOp(lhs, op, rhs) => {
            let a = real(eval_node(lhs)?)?;
            let b = real(eval_node(rhs)?)?;
            binary(a, *op, b).map(Value::Real)
        }

        // Canonicalization lowers units away; kept for trees built by hand.
        Expr::Unit(inner, unit) => {
            let x = real(eval_node(inner)?)?;
            Ok(Value::Real(match unit {
                AngleUnit::Deg => x.to_radians(),
                AngleUnit::Rad => x,
            }))
        }
    }
}

/// Functions cannot take part in arithmetic; they must be called.
fn real(value: Value) -> CalcResult<f64> {
    match value {
        Value::Real(x) => Ok(x),
        Value::Function(func) => Err(CalcError::IncompleteFunctionCall(func.name().into())),
    }
}

fn binary(a: f64, op: BinaryOperator, b: f64) -> CalcResult<f64> {
    Ok(match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => a / b,
        BinaryOperator::Pow => {
            if a < 0.0 && b.fract() != 0.0 && b.is_finite() {
                return Err(complex(format!("{a}^{b}")));
            }
            a.powf(b)
        }
    })
}

fn apply(func: Function, xs: &[f64]) -> CalcResult<f64> {
    let x = xs.first().copied().unwrap_or(f64::NAN);
    Ok(match func {
        Function::Sin => x.sin(),
        Function::Cos => x.cos(),
        Function::Tan => x.tan(),
        Function::Exp => x.exp(),
        Function::Sqrt => {
            if x < 0.0 {
                return Err(complex(format!("sqrt({x})")));
            }
            x.sqrt()
        }
        Function::Ln => {
            if x < 0.0 {
                return Err(complex(format!("ln({x})")));
            }
            x.ln()
        }
        Function::Log10 => {
            if x < 0.0 {
                return Err(complex(format!("log10({x})")));
            }
            x.log10()
        }
        Function::Log => match xs.get(1) {
            Some(&base) => {
                if x < 0.0 || base < 0.0 {
                    return Err(complex(format!("log({x}, {base})")));
                }
                x.ln() / base.ln()
            }
            None => {
                if x < 0.0 {
                    return Err(complex(format!("log({x})")));
                }
                x.log10()
            }
        },
    })
}

fn complex(what: String) -> CalcError {
    CalcError::UnsupportedResultType(format!("{what} has a complex (non-real) value"))
}

/// Round to [`ROUND_DECIMALS`] places through the decimal representation.
fn round_decimals(x: f64) -> f64 {
    let rounded = format!("{x:.prec$}", prec = ROUND_DECIMALS)
        .parse::<f64>()
        .unwrap_or(x);
    // Normalize negative zero
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
