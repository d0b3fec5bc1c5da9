//! Window operators for `$setWindowFields` outputs, plus the `$top`/`$bottom`
//! family that `$group` shares.

use aggro_core::{Error, Result, SortSpec};

use crate::expr::{Expr, Named};

pub fn rank() -> Expr {
    Expr::empty("$rank")
}

pub fn dense_rank() -> Expr {
    Expr::empty("$denseRank")
}

pub fn document_number() -> Expr {
    Expr::empty("$documentNumber")
}

#[derive(Debug, Clone)]
pub struct Shift {
    output: Expr,
    by: i64,
    default: Option<Expr>,
}

/// `by` is the relative document offset; negative looks back.
pub fn shift(output: impl Into<Expr>, by: i64) -> Shift {
    Shift {
        output: output.into(),
        by,
        default: None,
    }
}

impl Shift {
    optional_args!(default);
}

impl From<Shift> for Expr {
    fn from(s: Shift) -> Self {
        Named::new()
            .arg("output", s.output)
            .arg("by", s.by)
            .opt("default", s.default)
            .build("$shift")
    }
}

/// `{"$expMovingAvg": {"input": .., "N": n}}`
pub fn exp_moving_avg_n(input: impl Into<Expr>, n: i64) -> Result<Expr> {
    if n <= 0 {
        return Err(Error::invalid(format!("$expMovingAvg N must be positive, got {n}")));
    }
    Ok(Named::new()
        .arg("input", input)
        .arg("N", n)
        .build("$expMovingAvg"))
}

/// `{"$expMovingAvg": {"input": .., "alpha": a}}` with `0 < a < 1`.
pub fn exp_moving_avg_alpha(input: impl Into<Expr>, alpha: f64) -> Result<Expr> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(Error::invalid(format!(
            "$expMovingAvg alpha must be between 0 and 1 exclusive, got {alpha}"
        )));
    }
    Ok(Named::new()
        .arg("input", input)
        .arg("alpha", alpha)
        .build("$expMovingAvg"))
}

/// `$derivative` / `$integral` with an optional time `unit`.
#[derive(Debug, Clone)]
pub struct RateOfChange {
    name: &'static str,
    input: Expr,
    unit: Option<Expr>,
}

pub fn derivative(input: impl Into<Expr>) -> RateOfChange {
    RateOfChange {
        name: "$derivative",
        input: input.into(),
        unit: None,
    }
}

pub fn integral(input: impl Into<Expr>) -> RateOfChange {
    RateOfChange {
        name: "$integral",
        input: input.into(),
        unit: None,
    }
}

impl RateOfChange {
    optional_args!(unit);
}

impl From<RateOfChange> for Expr {
    fn from(r: RateOfChange) -> Self {
        Named::new()
            .arg("input", r.input)
            .opt("unit", r.unit)
            .build(r.name)
    }
}

pub fn covariance_pop(x: impl Into<Expr>, y: impl Into<Expr>) -> Expr {
    Expr::binary("$covariancePop", x, y)
}

pub fn covariance_samp(x: impl Into<Expr>, y: impl Into<Expr>) -> Expr {
    Expr::binary("$covarianceSamp", x, y)
}

pub fn linear_fill(input: impl Into<Expr>) -> Expr {
    Expr::unary("$linearFill", input)
}

/// Last observation carried forward.
pub fn locf(input: impl Into<Expr>) -> Expr {
    Expr::unary("$locf", input)
}

pub fn top(sort_by: SortSpec, output: impl Into<Expr>) -> Expr {
    ranked("$top", None, sort_by, output.into())
}

pub fn bottom(sort_by: SortSpec, output: impl Into<Expr>) -> Expr {
    ranked("$bottom", None, sort_by, output.into())
}

pub fn top_n(n: impl Into<Expr>, sort_by: SortSpec, output: impl Into<Expr>) -> Expr {
    ranked("$topN", Some(n.into()), sort_by, output.into())
}

pub fn bottom_n(n: impl Into<Expr>, sort_by: SortSpec, output: impl Into<Expr>) -> Expr {
    ranked("$bottomN", Some(n.into()), sort_by, output.into())
}

fn ranked(name: &'static str, n: Option<Expr>, sort_by: SortSpec, output: Expr) -> Expr {
    Named::new()
        .opt("n", n)
        .arg("sortBy", sort_by)
        .arg("output", output)
        .build(name)
}
