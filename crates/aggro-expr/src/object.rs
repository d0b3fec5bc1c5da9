//! Object expressions.

use crate::expr::{Expr, Named};

pub fn merge_objects<I, E>(objects: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$mergeObjects", objects)
}

pub fn object_to_array(input: impl Into<Expr>) -> Expr {
    Expr::unary("$objectToArray", input)
}

pub fn array_to_object(input: impl Into<Expr>) -> Expr {
    Expr::unary("$arrayToObject", input)
}

/// `{"$getField": "name"}` on the current document.
pub fn get_field(field: impl Into<Expr>) -> Expr {
    Expr::unary("$getField", field)
}

/// `{"$getField": {"field": .., "input": ..}}`
pub fn get_field_from(field: impl Into<Expr>, input: impl Into<Expr>) -> Expr {
    Named::new()
        .arg("field", field)
        .arg("input", input)
        .build("$getField")
}

pub fn set_field(field: impl Into<Expr>, input: impl Into<Expr>, value: impl Into<Expr>) -> Expr {
    Named::new()
        .arg("field", field)
        .arg("input", input)
        .arg("value", value)
        .build("$setField")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;
    use serde_json::json;

    #[test]
    fn test_merge_and_convert() {
        assert_eq!(
            merge_objects([Expr::from(field("defaults")), field("$$ROOT").into()]).to_value(),
            json!({"$mergeObjects": ["$defaults", "$$ROOT"]})
        );
        assert_eq!(object_to_array(field("o")).to_value(), json!({"$objectToArray": "$o"}));
        assert_eq!(array_to_object(field("a")).to_value(), json!({"$arrayToObject": "$a"}));
    }

    #[test]
    fn test_get_and_set_field() {
        assert_eq!(get_field("price.usd").to_value(), json!({"$getField": "price.usd"}));
        assert_eq!(
            get_field_from("qty", field("item")).to_value(),
            json!({"$getField": {"field": "qty", "input": "$item"}})
        );
        assert_eq!(
            set_field("a.b", field("$$ROOT"), 1).to_value(),
            json!({"$setField": {"field": "a.b", "input": "$$ROOT", "value": 1}})
        );
    }
}
