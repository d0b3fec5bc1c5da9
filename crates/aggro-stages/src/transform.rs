//! Reshaping stages: `$addFields`, `$set`, `$unset`, `$replaceRoot`,
//! `$replaceWith` and `$redact`.

use serde_json::Value;

use aggro_core::{Document, Error, OneOrMany, Operator, Result};
use aggro_expr::Expr;

use crate::validate::{document_expr, non_empty, spec_document};

#[derive(Debug, Clone, PartialEq)]
pub struct AddFields {
    fields: Document,
}

impl AddFields {
    pub fn new(fields: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            fields: spec_document(fields, "$addFields specification")?,
        })
    }
}

impl Operator for AddFields {
    fn name(&self) -> &'static str {
        "$addFields"
    }

    fn arguments(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// `$set`, the alias of `$addFields`.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    fields: Document,
}

impl Set {
    pub fn new(fields: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            fields: spec_document(fields, "$set specification")?,
        })
    }
}

impl Operator for Set {
    fn name(&self) -> &'static str {
        "$set"
    }

    fn arguments(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// `$unset`: a single field renders as a string, several as a list.
#[derive(Debug, Clone, PartialEq)]
pub struct Unset {
    fields: OneOrMany<String>,
}

impl Unset {
    pub fn new(fields: impl Into<OneOrMany<String>>) -> Result<Self> {
        let fields = fields.into();
        if fields.is_empty() {
            return Err(Error::missing("$unset needs at least one field"));
        }
        match &fields {
            OneOrMany::One(f) => {
                non_empty(f.as_str(), "$unset field")?;
            }
            OneOrMany::Many(fs) => {
                for f in fs {
                    non_empty(f.as_str(), "$unset field")?;
                }
            }
        }
        Ok(Self { fields })
    }
}

impl Operator for Unset {
    fn name(&self) -> &'static str {
        "$unset"
    }

    fn arguments(&self) -> Value {
        self.fields.clone().into_value()
    }
}

/// `{"$replaceRoot": {"newRoot": expr}}`
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceRoot {
    new_root: Expr,
}

impl ReplaceRoot {
    pub fn new(new_root: impl Into<Expr>) -> Result<Self> {
        Ok(Self {
            new_root: document_expr(new_root.into(), "$replaceRoot newRoot")?,
        })
    }
}

impl Operator for ReplaceRoot {
    fn name(&self) -> &'static str {
        "$replaceRoot"
    }

    fn arguments(&self) -> Value {
        let mut body = Document::new();
        body.insert("newRoot".to_string(), self.new_root.to_value());
        Value::Object(body)
    }
}

/// `{"$replaceWith": expr}`
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceWith {
    expression: Expr,
}

impl ReplaceWith {
    pub fn new(expression: impl Into<Expr>) -> Result<Self> {
        Ok(Self {
            expression: document_expr(expression.into(), "$replaceWith expression")?,
        })
    }
}

impl Operator for ReplaceWith {
    fn name(&self) -> &'static str {
        "$replaceWith"
    }

    fn arguments(&self) -> Value {
        self.expression.to_value()
    }
}

/// `$redact`: the expression must resolve to `$$DESCEND`, `$$PRUNE` or `$$KEEP`.
#[derive(Debug, Clone, PartialEq)]
pub struct Redact {
    expression: Expr,
}

impl Redact {
    pub fn new(expression: impl Into<Expr>) -> Result<Self> {
        Ok(Self {
            expression: document_expr(expression.into(), "$redact expression")?,
        })
    }
}

impl Operator for Redact {
    fn name(&self) -> &'static str {
        "$redact"
    }

    fn arguments(&self) -> Value {
        self.expression.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggro_expr::conditional::cond;
    use aggro_expr::{field, object};
    use serde_json::json;

    fn doc(op: &impl Operator) -> Value {
        Value::Object(op.to_document())
    }

    #[test]
    fn test_add_fields_and_set() {
        let a = AddFields::new(json!({"isActive": true, "score": {"$sum": "$marks"}})).unwrap();
        assert_eq!(
            doc(&a),
            json!({"$addFields": {"isActive": true, "score": {"$sum": "$marks"}}})
        );
        let s = Set::new(json!({"status": "processed"})).unwrap();
        assert_eq!(doc(&s), json!({"$set": {"status": "processed"}}));
        assert!(Set::new(json!({})).is_err());
        assert!(AddFields::new(json!("x")).is_err());
    }

    #[test]
    fn test_add_fields_from_expression_object() {
        let spec = Expr::object([(
            "total",
            aggro_expr::arithmetic::add([field("price"), field("tax")]),
        )]);
        let a = AddFields::new(spec).unwrap();
        assert_eq!(doc(&a), json!({"$addFields": {"total": {"$add": ["$price", "$tax"]}}}));
    }

    #[test]
    fn test_unset_forms() {
        assert_eq!(
            doc(&Unset::new("temporaryField").unwrap()),
            json!({"$unset": "temporaryField"})
        );
        assert_eq!(
            doc(&Unset::new(vec!["password", "secret"]).unwrap()),
            json!({"$unset": ["password", "secret"]})
        );
        assert!(Unset::new(Vec::<String>::new()).is_err());
        assert!(Unset::new("").is_err());
    }

    #[test]
    fn test_replace_root_and_with() {
        assert_eq!(
            doc(&ReplaceRoot::new("$nested").unwrap()),
            json!({"$replaceRoot": {"newRoot": "$nested"}})
        );
        assert_eq!(
            doc(&ReplaceWith::new(field("embedded")).unwrap()),
            json!({"$replaceWith": "$embedded"})
        );
        let merged = object::merge_objects([Expr::from(json!({"qty": 0})), field("$$ROOT").into()]);
        assert_eq!(
            doc(&ReplaceWith::new(merged).unwrap()),
            json!({"$replaceWith": {"$mergeObjects": [{"qty": 0}, "$$ROOT"]}})
        );
        assert!(ReplaceRoot::new(42).is_err());
        assert!(ReplaceWith::new("plain").is_err());
    }

    #[test]
    fn test_redact() {
        let r = Redact::new(cond(field("level").eq(5), "$$PRUNE", "$$DESCEND")).unwrap();
        assert_eq!(
            doc(&r),
            json!({"$redact": {"$cond": {
                "if": {"$eq": ["$level", 5]},
                "then": "$$PRUNE",
                "else": "$$DESCEND"
            }}})
        );
    }
}
