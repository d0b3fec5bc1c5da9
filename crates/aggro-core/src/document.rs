//! Ordered JSON documents and helpers for assembling them.
//!
//! `serde_json` is built with `preserve_order`, so a `Document` keeps keys in
//! insertion order. MongoDB reads `$sort` and friends positionally.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub type Document = Map<String, Value>;

/// `{key: value}`
pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Document {
    let mut doc = Document::new();
    doc.insert(key.into(), value.into());
    doc
}

/// Accept `value` only if it is a JSON object.
pub fn require_document(value: Value, what: &str) -> Result<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::invalid(format!(
            "{what} must be a document, got {}",
            value_kind(&other)
        ))),
    }
}

pub fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "document",
    }
}

/// Chained construction of documents with optional keys.
pub trait DocumentExt: Sized {
    fn with(self, key: &str, value: impl Into<Value>) -> Self;

    /// Insert only when `value` is `Some`.
    fn with_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self;
}

impl DocumentExt for Document {
    fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key.to_string(), value.into());
        self
    }

    fn with_opt<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.insert(key.to_string(), v.into());
        }
        self
    }
}

/// A parameter MongoDB accepts either as a scalar or as a list of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, OneOrMany::Many(v) if v.is_empty())
    }

    pub fn into_value(self) -> Value
    where
        T: Into<Value>,
    {
        match self {
            OneOrMany::One(v) => v.into(),
            OneOrMany::Many(vs) => Value::Array(vs.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(s: &str) -> Self {
        OneOrMany::One(s.to_string())
    }
}

impl From<String> for OneOrMany<String> {
    fn from(s: String) -> Self {
        OneOrMany::One(s)
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(v: Vec<&str>) -> Self {
        OneOrMany::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for OneOrMany<String> {
    fn from(v: Vec<String>) -> Self {
        OneOrMany::Many(v)
    }
}

impl From<i64> for OneOrMany<i64> {
    fn from(v: i64) -> Self {
        OneOrMany::One(v)
    }
}

impl From<Vec<i64>> for OneOrMany<i64> {
    fn from(v: Vec<i64>) -> Self {
        OneOrMany::Many(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_opt_skips_none() {
        let doc = single("a", 1)
            .with_opt("b", None::<i64>)
            .with_opt("c", Some("x"))
            .with("d", true);
        assert_eq!(Value::Object(doc), json!({"a": 1, "c": "x", "d": true}));
    }

    #[test]
    fn keys_keep_insertion_order() {
        let doc = single("z", 1).with("a", 2).with("m", 3);
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn require_document_rejects_scalars() {
        assert!(require_document(json!({"a": 1}), "query").is_ok());
        let err = require_document(json!([1, 2]), "query").unwrap_err();
        assert!(err.to_string().contains("query must be a document, got array"));
    }

    #[test]
    fn one_or_many_renders_scalar_or_list() {
        let one: OneOrMany<String> = "tags".into();
        assert_eq!(one.into_value(), json!("tags"));
        let many: OneOrMany<String> = vec!["a", "b"].into();
        assert_eq!(many.into_value(), json!(["a", "b"]));
        assert!(OneOrMany::<i64>::Many(vec![]).is_empty());
    }
}
