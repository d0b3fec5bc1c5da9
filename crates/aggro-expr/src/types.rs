//! Type conversion and inspection expressions.

use crate::expr::{Expr, Named};

unary_ops!(
    to_string => "$toString",
    to_int => "$toInt",
    to_long => "$toLong",
    to_double => "$toDouble",
    to_decimal => "$toDecimal",
    to_bool => "$toBool",
    to_object_id => "$toObjectId",
    type_of => "$type",
    is_number => "$isNumber",
);

/// `$convert` with optional fallbacks.
#[derive(Debug, Clone)]
pub struct Convert {
    input: Expr,
    to: Expr,
    on_error: Option<Expr>,
    on_null: Option<Expr>,
}

/// `to` is a type alias (`"int"`, `"date"`, ...) or numeric BSON type code.
pub fn convert(input: impl Into<Expr>, to: impl Into<Expr>) -> Convert {
    Convert {
        input: input.into(),
        to: to.into(),
        on_error: None,
        on_null: None,
    }
}

impl Convert {
    optional_args!(on_error, on_null);
}

impl From<Convert> for Expr {
    fn from(c: Convert) -> Self {
        Named::new()
            .arg("input", c.input)
            .arg("to", c.to)
            .opt("onError", c.on_error)
            .opt("onNull", c.on_null)
            .build("$convert")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;
    use serde_json::json;

    #[test]
    fn test_unary_conversions() {
        assert_eq!(to_string(field("n")).to_value(), json!({"$toString": "$n"}));
        assert_eq!(to_int(field("n")).to_value(), json!({"$toInt": "$n"}));
        assert_eq!(to_long(field("n")).operator_name(), Some("$toLong"));
        assert_eq!(to_double(field("n")).operator_name(), Some("$toDouble"));
        assert_eq!(to_decimal(field("n")).operator_name(), Some("$toDecimal"));
        assert_eq!(to_bool(field("n")).operator_name(), Some("$toBool"));
        assert_eq!(to_object_id(field("id")).to_value(), json!({"$toObjectId": "$id"}));
        assert_eq!(type_of(field("x")).to_value(), json!({"$type": "$x"}));
        assert_eq!(is_number(field("x")).to_value(), json!({"$isNumber": "$x"}));
    }

    #[test]
    fn test_convert() {
        let e: Expr = convert(field("price"), "decimal").on_error(0).on_null(0).into();
        assert_eq!(
            e.to_value(),
            json!({"$convert": {"input": "$price", "to": "decimal", "onError": 0, "onNull": 0}})
        );
        let bare: Expr = convert(field("price"), 1).into();
        assert_eq!(bare.to_value(), json!({"$convert": {"input": "$price", "to": 1}}));
    }
}
