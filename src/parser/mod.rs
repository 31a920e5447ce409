//! Strict-expression parser.
//!
//! Converts the lexer token stream into an expression tree and renders trees
//! back into strict-grammar text (`Display`).

use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter;

use crate::error::{CalcError, CalcResult};
use crate::lexer::{AngleUnit, Constant, Function, Token};

/* ------------------------------- AST ------------------------------- */
#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Number(f64),
    Constant(Constant),
    /// A function name with no argument list (`log10`).
    FunctionRef(Function),
    Call(Function, Vec<Expr>),
    Neg(Box<Expr>),
    BinaryOp(Box<Expr>, BinaryOperator, Box<Expr>),
    /// Postfix unit: `30 deg`, `(pi / 2) rad`.
    Unit(Box<Expr>, AngleUnit),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperator {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => " + ",
            BinaryOperator::Sub => " - ",
            BinaryOperator::Mul => " * ",
            BinaryOperator::Div => " / ",
            BinaryOperator::Pow => "^",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Sub => 1,
            BinaryOperator::Mul | BinaryOperator::Div => 2,
            BinaryOperator::Pow => 4,
        }
    }
}

impl Expr {
    pub fn binary(lhs: Expr, op: BinaryOperator, rhs: Expr) -> Expr {
        Expr::BinaryOp(Box::new(lhs), op, Box::new(rhs))
    }

    /// True if any node below (or at) this one carries an explicit unit word.
    pub fn has_unit(&self) -> bool {
        match self {
            Expr::Unit(..) => true,
            Expr::Number(_) | Expr::Constant(_) | Expr::FunctionRef(_) => false,
            Expr::Call(_, args) => args.iter().any(Expr::has_unit),
            Expr::Neg(inner) => inner.has_unit(),
            Expr::BinaryOp(l, _, r) => l.has_unit() || r.has_unit(),
        }
    }

    /// True if the tree contains any function call.
    pub fn has_call(&self) -> bool {
        match self {
            Expr::Call(..) | Expr::FunctionRef(_) => true,
            Expr::Number(_) | Expr::Constant(_) => false,
            Expr::Neg(inner) | Expr::Unit(inner, _) => inner.has_call(),
            Expr::BinaryOp(l, _, r) => l.has_call() || r.has_call(),
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        1 + match self {
            Expr::Number(_) | Expr::Constant(_) | Expr::FunctionRef(_) => 0,
            Expr::Call(_, args) => args.iter().map(Expr::height).max().unwrap_or(0),
            Expr::Neg(inner) | Expr::Unit(inner, _) => inner.height(),
            Expr::BinaryOp(l, _, r) => l.height().max(r.height()),
        }
    }

    /// True if the tree still describes work to do: an operator or a call.
    /// A literal, a signed literal or a constant is already an answer.
    pub fn is_computation(&self) -> bool {
        match self {
            Expr::BinaryOp(..) | Expr::Call(..) => true,
            Expr::Neg(inner) | Expr::Unit(inner, _) => inner.is_computation(),
            Expr::Number(_) | Expr::Constant(_) | Expr::FunctionRef(_) => false,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::BinaryOp(_, op, _) => op.precedence(),
            Expr::Neg(_) => 3,
            _ => 5,
        }
    }
}

/* ------------------------------ PARSER ------------------------------ */
/*  EBNF
    Expr    = Term    { ("+"|"-") Term } ;
    Term    = Unary   { ("*"|"/") Unary | Implicit } ;
    Implicit= Unary starting with a constant, function or "(" ;
    Unary   = ("-"|"+") Unary | Power ;
    Power   = Postfix [ "^" Unary ] ;            (right-associative)
    Postfix = Primary [ "deg" | "rad" ] ;
    Primary = Number | Constant
            | Function "(" Expr { "," Expr } ")"
            | Function                            (bare reference)
            | "(" Expr ")" ;
*/
type Tokens = Peekable<IntoIter<Token>>;

/// Deepest nesting and tallest tree the parser accepts.
pub const MAX_DEPTH: usize = 256;

fn too_deep() -> CalcError {
    CalcError::ParseFailure("expression nested too deeply".into())
}

/// Every node the parser builds goes through here, so no tree it returns
/// is taller than [`MAX_DEPTH`].
fn checked(expr: Expr) -> CalcResult<Expr> {
    if expr.height() > MAX_DEPTH {
        return Err(too_deep());
    }
    Ok(expr)
}

pub fn parse(tokens: Vec<Token>) -> CalcResult<Expr> {
    let mut it = tokens.into_iter().peekable();
    if it.peek().is_none() {
        return Err(CalcError::ParseFailure("empty expression".into()));
    }
    let expr = parse_expr(&mut it, 0)?;
    match it.next() {
        None => Ok(expr),
        Some(tok) => Err(CalcError::ParseFailure(format!(
            "unexpected {} after a complete expression",
            describe(&tok)
        ))),
    }
}

fn parse_expr(it: &mut Tokens, depth: usize) -> CalcResult<Expr> {
    let mut lhs = parse_term(it, depth)?;

    loop {
        let op = match it.peek() {
            Some(Token::Plus) => BinaryOperator::Add,
            Some(Token::Minus) => BinaryOperator::Sub,
            _ => break,
        };
        it.next(); // Consume operator.
        let rhs = parse_term(it, depth)?;
        lhs = checked(Expr::binary(lhs, op, rhs))?;
    }
    Ok(lhs)
}

fn parse_term(it: &mut Tokens, depth: usize) -> CalcResult<Expr> {
    let mut lhs = parse_unary(it, depth)?;

    loop {
        match it.peek() {
            Some(Token::Star) | Some(Token::Slash) => {
                let op = match it.next() {
                    Some(Token::Star) => BinaryOperator::Mul,
                    _ => BinaryOperator::Div,
                };
                let rhs = parse_unary(it, depth)?;
                lhs = checked(Expr::binary(lhs, op, rhs))?;
            }
            // `2pi`, `3(4 + 1)`, `2 sin(x)`
            Some(Token::Constant(_)) | Some(Token::Function(_)) | Some(Token::LParen) => {
                let rhs = parse_unary(it, depth)?;
                lhs = checked(Expr::binary(lhs, BinaryOperator::Mul, rhs))?;
            }
            _ => break,
        }
    }
    Ok(lhs)
}

// Every recursive cycle of the grammar passes through here.
fn parse_unary(it: &mut Tokens, depth: usize) -> CalcResult<Expr> {
    if depth > MAX_DEPTH {
        return Err(too_deep());
    }
    match it.peek() {
        Some(Token::Minus) => {
            it.next();
            checked(Expr::Neg(Box::new(parse_unary(it, depth + 1)?)))
        }
        Some(Token::Plus) => {
            it.next();
            parse_unary(it, depth + 1)
        }
        _ => parse_power(it, depth),
    }
}

fn parse_power(it: &mut Tokens, depth: usize) -> CalcResult<Expr> {
    let base = parse_postfix(it, depth)?;
    if matches!(it.peek(), Some(Token::Caret)) {
        it.next();
        let exponent = parse_unary(it, depth + 1)?; // Recursion gives right associativity.
        return checked(Expr::binary(base, BinaryOperator::Pow, exponent));
    }
    Ok(base)
}

fn parse_postfix(it: &mut Tokens, depth: usize) -> CalcResult<Expr> {
    let primary = parse_primary(it, depth)?;
    if let Some(Token::Unit(unit)) = it.peek() {
        let unit = *unit;
        it.next();
        return checked(Expr::Unit(Box::new(primary), unit));
    }
    Ok(primary)
}

fn parse_primary(it: &mut Tokens, depth: usize) -> CalcResult<Expr> {
    match it.next() {
        Some(Token::Number(n)) => Ok(Expr::Number(n)),
        Some(Token::Constant(c)) => Ok(Expr::Constant(c)),
        Some(Token::Function(func)) => {
            if !matches!(it.peek(), Some(Token::LParen)) {
                return Ok(Expr::FunctionRef(func));
            }
            it.next(); // '('
            let args = parse_args(it, depth + 1)?;
            if !func.accepts(args.len()) {
                return Err(CalcError::ParseFailure(format!(
                    "{func} does not take {} argument(s)",
                    args.len()
                )));
            }
            checked(Expr::Call(func, args))
        }

        // Parentheses.
        Some(Token::LParen) => {
            let inner = parse_expr(it, depth + 1)?; // Recursive.
            expect(Token::RParen, it)?; // Require ')'.
            Ok(inner)
        }
        Some(tok) => Err(CalcError::ParseFailure(format!(
            "unexpected {}",
            describe(&tok)
        ))),
        None => Err(CalcError::ParseFailure("unexpected end of expression".into())),
    }
}

fn parse_args(it: &mut Tokens, depth: usize) -> CalcResult<Vec<Expr>> {
    let mut args = Vec::new();
    if matches!(it.peek(), Some(Token::RParen)) {
        it.next();
        return Ok(args);
    }
    loop {
        args.push(parse_expr(it, depth)?);
        match it.next() {
            Some(Token::Comma) => continue,
            Some(Token::RParen) => return Ok(args),
            Some(tok) => {
                return Err(CalcError::ParseFailure(format!(
                    "expected ',' or ')' in argument list, found {}",
                    describe(&tok)
                )))
            }
            None => return Err(CalcError::ParseFailure("missing ')'".into())),
        }
    }
}

/* ---------- util ---------- */
fn expect(tok: Token, it: &mut Tokens) -> CalcResult<()> {
    match it.next() {
        Some(t) if t == tok => Ok(()),
        Some(t) => Err(CalcError::ParseFailure(format!(
            "expected {}, found {}",
            describe(&tok),
            describe(&t)
        ))),
        None => Err(CalcError::ParseFailure(format!(
            "expected {}, found end of expression",
            describe(&tok)
        ))),
    }
}

fn describe(tok: &Token) -> String {
    match tok {
        Token::Number(n) => format!("number {n}"),
        Token::Constant(c) => format!("'{}'", c.name()),
        Token::Function(f) => format!("'{f}'"),
        Token::Unit(u) => format!("unit '{}'", u.name()),
        Token::Plus => "'+'".into(),
        Token::Minus => "'-'".into(),
        Token::Star => "'*'".into(),
        Token::Slash => "'/'".into(),
        Token::Caret => "'^'".into(),
        Token::Comma => "','".into(),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
    }
}

/* ------------------------------ PRINTER ----------------------------- */
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Constant(c) => f.write_str(c.name()),
            Expr::FunctionRef(func) => write!(f, "{func}"),
            Expr::Call(func, args) => {
                write!(f, "{func}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Neg(inner) => {
                f.write_str("-")?;
                write_operand(f, inner, inner.precedence() < 3)
            }
            Expr::BinaryOp(lhs, op, rhs) => {
                let prec = op.precedence();
                // `^` is right-associative, everything else left-associative.
                let (wrap_l, wrap_r) = if *op == BinaryOperator::Pow {
                    (lhs.precedence() <= prec, rhs.precedence() < prec)
                } else {
                    (lhs.precedence() < prec, rhs.precedence() <= prec)
                };
                write_operand(f, lhs, wrap_l)?;
                f.write_str(op.symbol())?;
                write_operand(f, rhs, wrap_r)
            }
            Expr::Unit(inner, unit) => {
                write_operand(f, inner, inner.precedence() < 5)?;
                write!(f, " {}", unit.name())
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}
