//! Field references: `$path` strings with comparison sugar.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::comparison;
use crate::expr::Expr;

/// A `$`-prefixed field path. Paths that already start with `$` (including
/// `$$variables`) are kept as given.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Field {
    path: String,
}

/// Shorthand for [`Field::new`].
pub fn field(path: impl AsRef<str>) -> Field {
    Field::new(path)
}

impl Field {
    pub fn new(path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let path = if path.starts_with('$') {
            path.to_string()
        } else {
            format!("${path}")
        };
        Self { path }
    }

    /// The full reference, including the leading `$`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path with one leading `$` removed: `"$a.b"` -> `"a.b"`.
    pub fn name(&self) -> &str {
        &self.path[1..]
    }

    /// `$$name` references an aggregation variable rather than a field.
    pub fn is_variable(&self) -> bool {
        self.path.starts_with("$$")
    }

    /// `$a` -> `$a.sub`
    pub fn child(&self, sub: &str) -> Field {
        Field {
            path: format!("{}.{}", self.path, sub),
        }
    }

    // Inherent `eq`/`ne` take precedence over `PartialEq`; `==` still compares fields.
    #[allow(clippy::should_implement_trait)]
    pub fn eq(&self, other: impl Into<Expr>) -> Expr {
        comparison::eq(self, other)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn ne(&self, other: impl Into<Expr>) -> Expr {
        comparison::ne(self, other)
    }

    pub fn gt(&self, other: impl Into<Expr>) -> Expr {
        comparison::gt(self, other)
    }

    pub fn gte(&self, other: impl Into<Expr>) -> Expr {
        comparison::gte(self, other)
    }

    pub fn lt(&self, other: impl Into<Expr>) -> Expr {
        comparison::lt(self, other)
    }

    pub fn lte(&self, other: impl Into<Expr>) -> Expr {
        comparison::lte(self, other)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({:?})", self.path)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.path)
    }
}

impl From<Field> for serde_json::Value {
    fn from(f: Field) -> Self {
        serde_json::Value::String(f.path)
    }
}

impl From<&Field> for serde_json::Value {
    fn from(f: &Field) -> Self {
        serde_json::Value::String(f.path.clone())
    }
}
