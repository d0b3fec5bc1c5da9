//! Queryable-encryption string predicates.

use crate::expr::{Expr, Named};

pub fn enc_str_contains(input: impl Into<Expr>, substring: impl Into<Expr>) -> Expr {
    Named::new()
        .arg("input", input)
        .arg("substring", substring)
        .build("$encStrContains")
}

pub fn enc_str_starts_with(input: impl Into<Expr>, prefix: impl Into<Expr>) -> Expr {
    Named::new()
        .arg("input", input)
        .arg("prefix", prefix)
        .build("$encStrStartsWith")
}

pub fn enc_str_ends_with(input: impl Into<Expr>, suffix: impl Into<Expr>) -> Expr {
    Named::new()
        .arg("input", input)
        .arg("suffix", suffix)
        .build("$encStrEndsWith")
}

pub fn enc_str_normalized_eq(input: impl Into<Expr>, value: impl Into<Expr>) -> Expr {
    Named::new()
        .arg("input", input)
        .arg("value", value)
        .build("$encStrNormalizedEq")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;
    use serde_json::json;

    #[test]
    fn test_encrypted_predicates() {
        assert_eq!(
            enc_str_contains(field("ssn"), "12").to_value(),
            json!({"$encStrContains": {"input": "$ssn", "substring": "12"}})
        );
        assert_eq!(
            enc_str_starts_with(field("name"), "Jo").to_value(),
            json!({"$encStrStartsWith": {"input": "$name", "prefix": "Jo"}})
        );
        assert_eq!(
            enc_str_ends_with(field("name"), "hn").to_value(),
            json!({"$encStrEndsWith": {"input": "$name", "suffix": "hn"}})
        );
        assert_eq!(
            enc_str_normalized_eq(field("name"), "john").to_value(),
            json!({"$encStrNormalizedEq": {"input": "$name", "value": "john"}})
        );
    }
}
