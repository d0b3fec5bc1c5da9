//! `$cond`, `$ifNull`, `$switch`.

use aggro_core::{Error, Result};

use crate::expr::{Expr, Named};

/// `{"$cond": {"if": .., "then": .., "else": ..}}`
pub fn cond(if_: impl Into<Expr>, then: impl Into<Expr>, else_: impl Into<Expr>) -> Expr {
    Named::new()
        .arg("if", if_)
        .arg("then", then)
        .arg("else", else_)
        .build("$cond")
}

pub fn if_null(input: impl Into<Expr>, replacement: impl Into<Expr>) -> Expr {
    Expr::binary("$ifNull", input, replacement)
}

/// `$switch` builder. At least one branch is required.
#[derive(Debug, Clone, Default)]
pub struct Switch {
    branches: Vec<(Expr, Expr)>,
    default: Option<Expr>,
}

impl Switch {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    pub fn branch(mut self, case: impl Into<Expr>, then: impl Into<Expr>) -> Self {
        self.branches.push((case.into(), then.into()));
        self
    }

    pub fn default(mut self, value: impl Into<Expr>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn build(self) -> Result<Expr> {
        if self.branches.is_empty() {
            return Err(Error::missing("$switch requires at least one branch"));
        }
        let branches: Vec<Expr> = self
            .branches
            .into_iter()
            .map(|(case, then)| Expr::Object(vec![("case".into(), case), ("then".into(), then)]))
            .collect();
        Ok(Named::new()
            .arg("branches", branches)
            .opt("default", self.default)
            .build("$switch"))
    }
}
