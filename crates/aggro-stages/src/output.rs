//! Sampling, literal input and write stages: `$sample`, `$documents`, `$out`,
//! `$merge`.

use serde_json::Value;

use aggro_core::document::require_document;
use aggro_core::{Document, DocumentExt, Error, OneOrMany, Operator, Result};

use crate::validate::non_empty;

/// `{"$sample": {"size": n}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    size: i64,
}

impl Sample {
    pub fn new(size: i64) -> Result<Self> {
        if size <= 0 {
            return Err(Error::invalid(format!("$sample size must be positive, got {size}")));
        }
        Ok(Self { size })
    }
}

impl Operator for Sample {
    fn name(&self) -> &'static str {
        "$sample"
    }

    fn arguments(&self) -> Value {
        Value::Object(Document::new().with("size", self.size))
    }
}

/// `$out`: replace a collection with the pipeline output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Out {
    db: Option<String>,
    collection: String,
}

impl Out {
    pub fn new(collection: impl Into<String>) -> Result<Self> {
        Ok(Self {
            db: None,
            collection: non_empty(collection, "$out collection")?,
        })
    }

    /// Write to a collection in another database.
    pub fn to_db(db: impl Into<String>, collection: impl Into<String>) -> Result<Self> {
        Ok(Self {
            db: Some(non_empty(db, "$out db")?),
            collection: non_empty(collection, "$out collection")?,
        })
    }
}

impl Operator for Out {
    fn name(&self) -> &'static str {
        "$out"
    }

    fn arguments(&self) -> Value {
        match &self.db {
            None => Value::String(self.collection.clone()),
            Some(db) => Value::Object(
                Document::new()
                    .with("db", db.clone())
                    .with("coll", self.collection.clone()),
            ),
        }
    }
}

/// `$merge` behaviour when a result matches an existing document.
#[derive(Debug, Clone, PartialEq)]
pub enum WhenMatched {
    Replace,
    KeepExisting,
    Merge,
    Fail,
    /// Update pipeline run against the matched document.
    Pipeline(Vec<Document>),
}

impl From<&WhenMatched> for Value {
    fn from(w: &WhenMatched) -> Self {
        match w {
            WhenMatched::Replace => "replace".into(),
            WhenMatched::KeepExisting => "keepExisting".into(),
            WhenMatched::Merge => "merge".into(),
            WhenMatched::Fail => "fail".into(),
            WhenMatched::Pipeline(stages) => stages.clone().into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhenNotMatched {
    Insert,
    Discard,
    Fail,
}

impl WhenNotMatched {
    pub fn as_str(&self) -> &'static str {
        match self {
            WhenNotMatched::Insert => "insert",
            WhenNotMatched::Discard => "discard",
            WhenNotMatched::Fail => "fail",
        }
    }
}

/// `$merge`: upsert results into a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    into: Value,
    on: Option<OneOrMany<String>>,
    let_vars: Option<Document>,
    when_matched: Option<WhenMatched>,
    when_not_matched: Option<WhenNotMatched>,
}

impl Merge {
    pub fn new(collection: impl Into<String>) -> Result<Self> {
        let collection = non_empty(collection, "$merge into")?;
        Ok(Self::with_target(Value::String(collection)))
    }

    /// `into: {db, coll}`
    pub fn into_db(db: impl Into<String>, collection: impl Into<String>) -> Result<Self> {
        let target = Document::new()
            .with("db", non_empty(db, "$merge db")?)
            .with("coll", non_empty(collection, "$merge collection")?);
        Ok(Self::with_target(Value::Object(target)))
    }

    fn with_target(into: Value) -> Self {
        Self {
            into,
            on: None,
            let_vars: None,
            when_matched: None,
            when_not_matched: None,
        }
    }

    /// Field(s) identifying a match; requires a unique index on the target.
    pub fn on(mut self, fields: impl Into<OneOrMany<String>>) -> Result<Self> {
        let fields = fields.into();
        if fields.is_empty() {
            return Err(Error::missing("$merge on needs at least one field"));
        }
        self.on = Some(fields);
        Ok(self)
    }

    /// Variables for a [`WhenMatched::Pipeline`].
    pub fn let_vars(mut self, vars: impl Into<Value>) -> Result<Self> {
        self.let_vars = Some(require_document(vars.into(), "$merge let")?);
        Ok(self)
    }

    pub fn when_matched(mut self, action: WhenMatched) -> Self {
        self.when_matched = Some(action);
        self
    }

    pub fn when_not_matched(mut self, action: WhenNotMatched) -> Self {
        self.when_not_matched = Some(action);
        self
    }
}

impl Operator for Merge {
    fn name(&self) -> &'static str {
        "$merge"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with("into", self.into.clone())
                .with_opt("on", self.on.clone().map(OneOrMany::into_value))
                .with_opt("let", self.let_vars.clone())
                .with_opt("whenMatched", self.when_matched.as_ref().map(Value::from))
                .with_opt(
                    "whenNotMatched",
                    self.when_not_matched.map(|w| w.as_str()),
                ),
        )
    }
}

/// `$documents`: literal input documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Documents {
    documents: Vec<Document>,
}

impl Documents {
    pub fn new<I, V>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let documents = documents
            .into_iter()
            .enumerate()
            .map(|(i, v)| require_document(v.into(), &format!("$documents[{i}]")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { documents })
    }
}

impl Operator for Documents {
    fn name(&self) -> &'static str {
        "$documents"
    }

    fn arguments(&self) -> Value {
        self.documents.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(op: &impl Operator) -> Value {
        Value::Object(op.to_document())
    }

    #[test]
    fn test_sample() {
        assert_eq!(doc(&Sample::new(10).unwrap()), json!({"$sample": {"size": 10}}));
        assert!(Sample::new(0).is_err());
    }

    #[test]
    fn test_out() {
        assert_eq!(doc(&Out::new("results").unwrap()), json!({"$out": "results"}));
        assert_eq!(
            doc(&Out::to_db("analytics", "results").unwrap()),
            json!({"$out": {"db": "analytics", "coll": "results"}})
        );
        assert!(Out::new("").is_err());
        assert!(Out::to_db("", "results").is_err());
    }

    #[test]
    fn test_merge() {
        let m = Merge::new("reports")
            .unwrap()
            .on("_id")
            .unwrap()
            .when_matched(WhenMatched::Merge)
            .when_not_matched(WhenNotMatched::Insert);
        assert_eq!(
            doc(&m),
            json!({"$merge": {
                "into": "reports",
                "on": "_id",
                "whenMatched": "merge",
                "whenNotMatched": "insert"
            }})
        );
        assert_eq!(doc(&Merge::new("r").unwrap()), json!({"$merge": {"into": "r"}}));
    }

    #[test]
    fn test_merge_pipeline_and_db() {
        let update = vec![json!({"$set": {"total": {"$add": ["$total", "$$new.total"]}}})
            .as_object()
            .unwrap()
            .clone()];
        let m = Merge::into_db("reporting", "totals")
            .unwrap()
            .on(vec!["region", "month"])
            .unwrap()
            .let_vars(json!({"new": "$$ROOT"}))
            .unwrap()
            .when_matched(WhenMatched::Pipeline(update));
        assert_eq!(
            m.arguments(),
            json!({
                "into": {"db": "reporting", "coll": "totals"},
                "on": ["region", "month"],
                "let": {"new": "$$ROOT"},
                "whenMatched": [{"$set": {"total": {"$add": ["$total", "$$new.total"]}}}]
            })
        );
        assert!(Merge::new("x").unwrap().on(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_documents() {
        let d = Documents::new([json!({"x": 1, "y": 2}), json!({"x": 3, "y": 4})]).unwrap();
        assert_eq!(
            doc(&d),
            json!({"$documents": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]})
        );
        assert!(Documents::new([json!({"x": 1}), json!(2)]).is_err());
        assert_eq!(
            doc(&Documents::new(Vec::<Value>::new()).unwrap()),
            json!({"$documents": []})
        );
    }
}
