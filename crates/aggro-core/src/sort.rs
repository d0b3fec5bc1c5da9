//! Sort directions shared by `$sort`, `$sortArray`, window `sortBy` and friends.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

pub const ASCENDING: SortOrder = SortOrder::Ascending;
pub const DESCENDING: SortOrder = SortOrder::Descending;

impl SortOrder {
    pub const fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    pub fn from_i64(v: i64) -> Result<Self> {
        match v {
            1 => Ok(SortOrder::Ascending),
            -1 => Ok(SortOrder::Descending),
            other => Err(Error::invalid(format!(
                "sort direction must be 1 or -1, got {other}"
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

impl From<SortOrder> for Value {
    fn from(o: SortOrder) -> Self {
        Value::from(o.as_i32())
    }
}

impl Serialize for SortOrder {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_i32(self.as_i32())
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let v = i64::deserialize(d)?;
        SortOrder::from_i64(v).map_err(serde::de::Error::custom)
    }
}

/// Ordered `field -> direction` list. Key order decides sort precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Document", into = "Document")]
pub struct SortSpec {
    keys: Vec<(String, SortOrder)>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `field` with `order`. A repeated field keeps its first position
    /// and takes the new direction.
    pub fn field(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        let field = field.into();
        match self.keys.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = order,
            None => self.keys.push((field, order)),
        }
        self
    }

    pub fn asc(self, field: impl Into<String>) -> Self {
        self.field(field, SortOrder::Ascending)
    }

    pub fn desc(self, field: impl Into<String>) -> Self {
        self.field(field, SortOrder::Descending)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortOrder)> {
        self.keys.iter().map(|(f, o)| (f.as_str(), *o))
    }

    pub fn to_document(&self) -> Document {
        self.keys
            .iter()
            .map(|(f, o)| (f.clone(), Value::from(*o)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, SortOrder)> for SortSpec {
    fn from_iter<I: IntoIterator<Item = (S, SortOrder)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(SortSpec::new(), |spec, (f, o)| spec.field(f, o))
    }
}

impl From<SortSpec> for Document {
    fn from(spec: SortSpec) -> Self {
        spec.to_document()
    }
}

impl From<SortSpec> for Value {
    fn from(spec: SortSpec) -> Self {
        Value::Object(spec.to_document())
    }
}

impl TryFrom<Document> for SortSpec {
    type Error = Error;

    fn try_from(doc: Document) -> Result<Self> {
        let mut spec = SortSpec::new();
        for (field, dir) in doc {
            let order = dir
                .as_i64()
                .ok_or_else(|| {
                    Error::invalid(format!("sort direction for {field} must be 1 or -1"))
                })
                .and_then(SortOrder::from_i64)?;
            spec = spec.field(field, order);
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_spec_preserves_order() {
        let spec = SortSpec::new().desc("created_at").asc("name");
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({"created_at": -1, "name": 1})
        );
        let keys: Vec<&str> = spec.iter().map(|(f, _)| f).collect();
        assert_eq!(keys, vec!["created_at", "name"]);
    }

    #[test]
    fn test_repeated_field_keeps_position() {
        let spec = SortSpec::new().asc("a").asc("b").desc("a");
        assert_eq!(Value::from(spec), json!({"a": -1, "b": 1}));
    }

    #[test]
    fn test_sort_spec_from_document_validates() {
        let ok: SortSpec = serde_json::from_value(json!({"x": 1, "y": -1})).unwrap();
        assert_eq!(ok.len(), 2);
        assert!(serde_json::from_value::<SortSpec>(json!({"x": 2})).is_err());
        assert!(serde_json::from_value::<SortSpec>(json!({"x": "asc"})).is_err());
    }

    #[test]
    fn test_constants() {
        assert_eq!(ASCENDING.as_i32(), 1);
        assert_eq!(DESCENDING.as_i32(), -1);
        assert_eq!(DESCENDING.to_string(), "-1");
    }
}
