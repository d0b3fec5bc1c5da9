//! `$and`, `$or`, `$not`.
//!
//! The `&`, `|` and `!` operators on [`Expr`] build the same trees and flatten
//! chains; these functions take explicit condition lists.

use crate::expr::Expr;

pub fn and<I, E>(conditions: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$and", conditions)
}

pub fn or<I, E>(conditions: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$or", conditions)
}

pub fn not(condition: impl Into<Expr>) -> Expr {
    Expr::unary("$not", condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;
    use serde_json::json;

    #[test]
    fn test_explicit_and() {
        let e = and([field("a").eq(1), field("b").gt(2)]);
        assert_eq!(
            e.to_value(),
            json!({"$and": [{"$eq": ["$a", 1]}, {"$gt": ["$b", 2]}]})
        );
    }

    #[test]
    fn test_explicit_and_extends_with_operator() {
        let e = and([field("a").eq(1), field("b").eq(2)]) & field("c").eq(3);
        assert_eq!(e.to_value()["$and"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_or_and_not() {
        let e = or([field("a").eq(1), field("a").eq(2)]);
        assert_eq!(e.operator_name(), Some("$or"));
        assert_eq!(
            not(field("a").eq(1)).to_value(),
            json!({"$not": {"$eq": ["$a", 1]}})
        );
        assert_eq!(not(field("a").eq(1)), !field("a").eq(1));
    }
}
