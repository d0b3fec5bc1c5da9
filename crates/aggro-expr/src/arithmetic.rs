//! Arithmetic expressions.

use crate::expr::Expr;

pub fn add<I, E>(operands: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$add", operands)
}

pub fn multiply<I, E>(operands: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$multiply", operands)
}

pub fn subtract(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$subtract", left, right)
}

pub fn divide(dividend: impl Into<Expr>, divisor: impl Into<Expr>) -> Expr {
    Expr::binary("$divide", dividend, divisor)
}

/// `$mod`
pub fn modulo(dividend: impl Into<Expr>, divisor: impl Into<Expr>) -> Expr {
    Expr::binary("$mod", dividend, divisor)
}

pub fn pow(base: impl Into<Expr>, exponent: impl Into<Expr>) -> Expr {
    Expr::binary("$pow", base, exponent)
}

pub fn log(input: impl Into<Expr>, base: impl Into<Expr>) -> Expr {
    Expr::binary("$log", input, base)
}

pub fn abs(input: impl Into<Expr>) -> Expr {
    Expr::unary("$abs", input)
}

pub fn ceil(input: impl Into<Expr>) -> Expr {
    Expr::unary("$ceil", input)
}

pub fn floor(input: impl Into<Expr>) -> Expr {
    Expr::unary("$floor", input)
}

pub fn sqrt(input: impl Into<Expr>) -> Expr {
    Expr::unary("$sqrt", input)
}

pub fn exp(input: impl Into<Expr>) -> Expr {
    Expr::unary("$exp", input)
}

pub fn ln(input: impl Into<Expr>) -> Expr {
    Expr::unary("$ln", input)
}

pub fn log10(input: impl Into<Expr>) -> Expr {
    Expr::unary("$log10", input)
}

/// `{"$round": [input, place]}`; pass 0 for whole numbers.
pub fn round(input: impl Into<Expr>, place: i32) -> Expr {
    Expr::binary("$round", input, place)
}

/// `{"$trunc": [input, place]}`
pub fn trunc(input: impl Into<Expr>, place: i32) -> Expr {
    Expr::binary("$trunc", input, place)
}
