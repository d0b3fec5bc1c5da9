//! The everyday stages: `$match`, `$project`, `$group`, `$sort`, `$limit`,
//! `$skip` and `$count`.

use serde_json::Value;

use aggro_core::document::require_document;
use aggro_core::{Document, Error, Operator, Result, SortSpec};
use aggro_expr::Expr;
use aggro_operators::{merge_accumulators, validate_output_name, Accumulator};

use crate::validate::{output_field, spec_document};

/// `{"$match": query}`
///
/// The query is any document: a literal filter, a [`aggro_operators::Query`],
/// or `{"$expr": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    query: Document,
}

impl Match {
    pub fn new(query: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            query: require_document(query.into(), "$match query")?,
        })
    }

    /// `{"$match": {"$expr": e}}`
    pub fn expr(e: impl Into<Expr>) -> Self {
        let mut query = Document::new();
        query.insert("$expr".to_string(), e.into().into());
        Self { query }
    }

    pub fn query(&self) -> &Document {
        &self.query
    }
}

impl Operator for Match {
    fn name(&self) -> &'static str {
        "$match"
    }

    fn arguments(&self) -> Value {
        Value::Object(self.query.clone())
    }
}

/// `{"$project": fields}` with `1`/`0` inclusions or computed expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    fields: Document,
}

impl Project {
    pub fn new(fields: impl Into<Value>) -> Result<Self> {
        Ok(Self {
            fields: spec_document(fields, "$project specification")?,
        })
    }
}

impl Operator for Project {
    fn name(&self) -> &'static str {
        "$project"
    }

    fn arguments(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// `{"$group": {"_id": id, ...accumulators}}`. `_id` always renders first.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: Expr,
    accumulators: Document,
}

impl Group {
    pub fn new<I>(id: impl Into<Expr>, accumulators: I) -> Result<Self>
    where
        I: IntoIterator<Item = Accumulator>,
    {
        Ok(Self {
            id: id.into(),
            accumulators: merge_accumulators(accumulators)?,
        })
    }

    /// Accumulators given as a prebuilt `{name: {"$op": ...}}` document.
    pub fn from_document(id: impl Into<Expr>, accumulators: Document) -> Result<Self> {
        for (name, spec) in &accumulators {
            validate_output_name(name)?;
            if !spec.is_object() {
                return Err(Error::invalid(format!(
                    "accumulator '{name}' must be an operator document"
                )));
            }
        }
        Ok(Self {
            id: id.into(),
            accumulators,
        })
    }

    /// Group everything into one bucket (`_id: null`).
    pub fn all<I>(accumulators: I) -> Result<Self>
    where
        I: IntoIterator<Item = Accumulator>,
    {
        Self::new(Value::Null, accumulators)
    }
}

impl Operator for Group {
    fn name(&self) -> &'static str {
        "$group"
    }

    fn arguments(&self) -> Value {
        let mut body = Document::new();
        body.insert("_id".to_string(), self.id.to_value());
        body.extend(self.accumulators.clone());
        Value::Object(body)
    }
}

/// `{"$sort": {field: 1 | -1, ...}}` in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    spec: SortSpec,
}

impl Sort {
    pub fn new(spec: SortSpec) -> Result<Self> {
        if spec.is_empty() {
            return Err(Error::missing("$sort needs at least one field"));
        }
        Ok(Self { spec })
    }

    /// Directions other than `1` and `-1` are rejected.
    pub fn from_document(doc: Document) -> Result<Self> {
        Self::new(SortSpec::try_from(doc)?)
    }

    pub fn spec(&self) -> &SortSpec {
        &self.spec
    }
}

impl Operator for Sort {
    fn name(&self) -> &'static str {
        "$sort"
    }

    fn arguments(&self) -> Value {
        self.spec.clone().into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(i64);

impl Limit {
    pub fn new(count: i64) -> Result<Self> {
        if count <= 0 {
            return Err(Error::invalid(format!("$limit must be positive, got {count}")));
        }
        Ok(Self(count))
    }
}

impl Operator for Limit {
    fn name(&self) -> &'static str {
        "$limit"
    }

    fn arguments(&self) -> Value {
        self.0.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip(i64);

impl Skip {
    pub fn new(count: i64) -> Result<Self> {
        if count < 0 {
            return Err(Error::invalid(format!(
                "$skip must be non-negative, got {count}"
            )));
        }
        Ok(Self(count))
    }
}

impl Operator for Skip {
    fn name(&self) -> &'static str {
        "$skip"
    }

    fn arguments(&self) -> Value {
        self.0.into()
    }
}

/// `{"$count": "field"}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Count {
    field: String,
}

impl Count {
    pub fn new(field: impl Into<String>) -> Result<Self> {
        Ok(Self {
            field: output_field(field, "$count field")?,
        })
    }
}

impl Operator for Count {
    fn name(&self) -> &'static str {
        "$count"
    }

    fn arguments(&self) -> Value {
        Value::String(self.field.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggro_expr::field;
    use aggro_operators::{Query, QueryOp};
    use serde_json::json;

    fn doc(op: &impl Operator) -> Value {
        Value::Object(op.to_document())
    }

    #[test]
    fn test_match() {
        let m = Match::new(json!({"status": "active"})).unwrap();
        assert_eq!(doc(&m), json!({"$match": {"status": "active"}}));

        let q = Query::new()
            .eq("status", "active")
            .field("age", QueryOp::gt(18));
        assert_eq!(
            doc(&Match::new(q).unwrap()),
            json!({"$match": {"status": "active", "age": {"$gt": 18}}})
        );

        assert!(Match::new(json!(["status"])).is_err());
    }

    #[test]
    fn test_match_expr() {
        let m = Match::expr(field("spent").gt(field("budget")));
        assert_eq!(
            doc(&m),
            json!({"$match": {"$expr": {"$gt": ["$spent", "$budget"]}}})
        );
    }

    #[test]
    fn test_project() {
        let p = Project::new(json!({"name": 1, "year": 1, "_id": 0})).unwrap();
        assert_eq!(doc(&p), json!({"$project": {"name": 1, "year": 1, "_id": 0}}));
        assert!(Project::new(json!({})).is_err());
    }

    #[test]
    fn test_group_id_first() {
        let g = Group::new(
            "$category",
            [
                Accumulator::sum("total").field("quantity"),
                Accumulator::sum("count").value(1),
            ],
        )
        .unwrap();
        assert_eq!(
            doc(&g),
            json!({"$group": {
                "_id": "$category",
                "total": {"$sum": "$quantity"},
                "count": {"$sum": 1}
            }})
        );
        let keys: Vec<String> = g.arguments().as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["_id", "total", "count"]);
    }

    #[test]
    fn test_group_all_and_compound_id() {
        let g = Group::all([Accumulator::avg("avgPrice").field("price")]).unwrap();
        assert_eq!(
            doc(&g),
            json!({"$group": {"_id": null, "avgPrice": {"$avg": "$price"}}})
        );

        let id = Expr::object([("year", field("year")), ("month", field("month"))]);
        let g = Group::new(id, []).unwrap();
        assert_eq!(
            doc(&g),
            json!({"$group": {"_id": {"year": "$year", "month": "$month"}}})
        );
    }

    #[test]
    fn test_group_from_document() {
        let accs = json!({"n": {"$sum": 1}});
        let g = Group::from_document("$k", accs.as_object().unwrap().clone()).unwrap();
        assert_eq!(doc(&g), json!({"$group": {"_id": "$k", "n": {"$sum": 1}}}));

        let bad = json!({"_id": {"$sum": 1}});
        assert!(Group::from_document("$k", bad.as_object().unwrap().clone()).is_err());
        let bad = json!({"n": 1});
        assert!(Group::from_document("$k", bad.as_object().unwrap().clone()).is_err());
    }

    #[test]
    fn test_sort_keeps_key_order() {
        let s = Sort::new(SortSpec::new().desc("age").asc("name")).unwrap();
        assert_eq!(doc(&s), json!({"$sort": {"age": -1, "name": 1}}));
        let rendered = serde_json::to_string(&doc(&s)).unwrap();
        assert_eq!(rendered, r#"{"$sort":{"age":-1,"name":1}}"#);
    }

    #[test]
    fn test_sort_validation() {
        assert!(matches!(Sort::new(SortSpec::new()), Err(Error::Missing(_))));
        let bad = json!({"age": 2});
        assert!(Sort::from_document(bad.as_object().unwrap().clone()).is_err());
        let ok = json!({"age": -1});
        assert!(Sort::from_document(ok.as_object().unwrap().clone()).is_ok());
    }

    #[test]
    fn test_limit_skip_count() {
        assert_eq!(doc(&Limit::new(10).unwrap()), json!({"$limit": 10}));
        assert!(Limit::new(0).is_err());
        assert!(Limit::new(-1).is_err());

        assert_eq!(doc(&Skip::new(5).unwrap()), json!({"$skip": 5}));
        assert_eq!(doc(&Skip::new(0).unwrap()), json!({"$skip": 0}));
        assert!(Skip::new(-1).is_err());

        assert_eq!(doc(&Count::new("total").unwrap()), json!({"$count": "total"}));
        assert!(Count::new("").is_err());
        assert!(Count::new("$total").is_err());
        assert!(Count::new("a.b").is_err());
    }
}
