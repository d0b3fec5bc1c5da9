//! Ordered `$match` filter documents.

use serde::{Serialize, Serializer};
use serde_json::Value;

use aggro_core::{Document, Operator};
use aggro_expr::Expr;

use super::QueryOp;

/// A filter document built field by field, in insertion order.
///
/// ```
/// use aggro_operators::{Query, QueryOp};
/// use serde_json::json;
///
/// let q = Query::new()
///     .eq("status", "active")
///     .field("age", QueryOp::gte(18))
///     .field("age", QueryOp::lt(65));
/// assert_eq!(
///     serde_json::Value::from(q),
///     json!({"status": "active", "age": {"$gte": 18, "$lt": 65}})
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    doc: Document,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{field: value}` implicit equality. Replaces earlier conditions on `field`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.doc.insert(field.into(), value.into());
        self
    }

    /// `{field: {op}}`. Operators on the same field merge into one document;
    /// an earlier implicit equality on `field` is replaced.
    pub fn field(mut self, field: impl Into<String>, op: QueryOp) -> Self {
        let field = field.into();
        let rendered = op.to_document();
        if let Some(Value::Object(existing)) = self.doc.get_mut(&field) {
            if is_operator_doc(existing) {
                existing.extend(rendered);
                return self;
            }
        }
        self.doc.insert(field, Value::Object(rendered));
        self
    }

    /// Top-level operator such as `$and`, `$or`, `$text`.
    pub fn op(mut self, op: QueryOp) -> Self {
        self.doc.extend(op.to_document());
        self
    }

    /// `{"$expr": expression}`
    pub fn expr(self, e: impl Into<Expr>) -> Self {
        self.op(QueryOp::expr(e))
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    pub fn to_document(&self) -> Document {
        self.doc.clone()
    }

    pub fn into_document(self) -> Document {
        self.doc
    }
}

fn is_operator_doc(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|k| k.starts_with('$'))
}

impl From<Query> for Document {
    fn from(q: Query) -> Self {
        q.doc
    }
}

impl From<Query> for Value {
    fn from(q: Query) -> Self {
        Value::Object(q.doc)
    }
}

impl From<Document> for Query {
    fn from(doc: Document) -> Self {
        Self { doc }
    }
}

impl Serialize for Query {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.doc.serialize(s)
    }
}
