//! Comparison expressions. All render as `{"$op": [left, right]}`.

use crate::expr::Expr;

pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$eq", left, right)
}

pub fn ne(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$ne", left, right)
}

pub fn gt(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$gt", left, right)
}

pub fn gte(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$gte", left, right)
}

pub fn lt(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$lt", left, right)
}

pub fn lte(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$lte", left, right)
}

/// -1, 0 or 1 depending on ordering.
pub fn cmp(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary("$cmp", left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;
    use serde_json::json;

    #[test]
    fn test_overloaded_matches_explicit() {
        assert_eq!(field("a").eq(1), eq(field("a"), 1));
        assert_eq!(field("a").ne("x"), ne(field("a"), "x"));
        assert_eq!(field("a").gt(1.5), gt(field("a"), 1.5));
        assert_eq!(field("a").gte(1), gte(field("a"), 1));
        assert_eq!(field("a").lt(1), lt(field("a"), 1));
        assert_eq!(field("a").lte(1), lte(field("a"), 1));
    }

    #[test]
    fn test_cmp() {
        assert_eq!(
            cmp(field("qty"), 250).to_value(),
            json!({"$cmp": ["$qty", 250]})
        );
    }

    #[test]
    fn test_eq_null_and_string_literal() {
        assert_eq!(
            eq(field("deleted_at"), None::<i64>).to_value(),
            json!({"$eq": ["$deleted_at", null]})
        );
        assert_eq!(
            eq("$a", "$b").to_value(),
            json!({"$eq": ["$a", "$b"]})
        );
    }
}
