#![forbid(unsafe_code)]
//! aggro-expr: field references and aggregation expression trees.
//!
//! ```
//! use aggro_expr::{field, Expr};
//! use serde_json::json;
//!
//! let e: Expr = field("status").eq("active") & field("age").gte(18);
//! assert_eq!(
//!     e.to_value(),
//!     json!({"$and": [{"$eq": ["$status", "active"]}, {"$gte": ["$age", 18]}]})
//! );
//! ```
//!
//! Operators are grouped by MongoDB's own categories. Simple operators are
//! plain functions returning [`Expr`]; operators with optional parameters
//! return a small builder that converts into [`Expr`].

// Builder setters for optional `Option<Expr>` fields named after the field.
macro_rules! optional_args {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(mut self, value: impl Into<$crate::expr::Expr>) -> Self {
                self.$field = Some(value.into());
                self
            }
        )*
    };
}

macro_rules! unary_ops {
    ($($fn_name:ident => $op:literal),* $(,)?) => {
        $(
            pub fn $fn_name(input: impl Into<$crate::expr::Expr>) -> $crate::expr::Expr {
                $crate::expr::Expr::unary($op, input)
            }
        )*
    };
}

pub mod expr;
pub mod field;

pub mod arithmetic;
pub mod array;
pub mod bitwise;
pub mod comparison;
pub mod conditional;
pub mod date;
pub mod encrypted;
pub mod logical;
pub mod object;
pub mod set;
pub mod size;
pub mod string;
pub mod trigonometry;
pub mod types;
pub mod variable;
pub mod window;

pub use expr::{Args, Expr, OperatorExpr};
pub use field::{field, Field};
