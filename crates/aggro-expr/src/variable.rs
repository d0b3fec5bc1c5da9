//! `$let`, `$literal`, `$rand`.

use serde_json::Value;

use crate::expr::{Expr, Named};

/// `{"$let": {"vars": {..}, "in": ..}}`; reference vars as `$$name` inside `in_`.
pub fn let_in<I, K, E>(vars: I, in_: impl Into<Expr>) -> Expr
where
    I: IntoIterator<Item = (K, E)>,
    K: Into<String>,
    E: Into<Expr>,
{
    Named::new()
        .arg("vars", Expr::object(vars))
        .arg("in", in_)
        .build("$let")
}

/// Wraps `value` so MongoDB does not evaluate it (e.g. strings starting with `$`).
pub fn literal(value: impl Into<Value>) -> Expr {
    Expr::unary("$literal", Expr::Literal(value.into()))
}

/// Uniform random float in [0, 1).
pub fn rand() -> Expr {
    Expr::empty("$rand")
}
