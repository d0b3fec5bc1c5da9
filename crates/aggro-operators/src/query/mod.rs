//! Query-language operators, the vocabulary of `$match` filters.

pub mod builder;
pub mod geo;

pub use builder::Query;

use serde_json::Value;

use aggro_core::{Document, DocumentExt, Error, OneOrMany, Operator, Result};
use aggro_expr::Expr;

use self::geo::{GeoWithin, Near};

/// A `$type` argument: a string alias (`"string"`, `"objectId"`) or numeric code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BsonType {
    Alias(String),
    Code(i32),
}

impl From<&str> for BsonType {
    fn from(s: &str) -> Self {
        BsonType::Alias(s.to_string())
    }
}

impl From<String> for BsonType {
    fn from(s: String) -> Self {
        BsonType::Alias(s)
    }
}

impl From<i32> for BsonType {
    fn from(c: i32) -> Self {
        BsonType::Code(c)
    }
}

impl From<BsonType> for Value {
    fn from(t: BsonType) -> Self {
        match t {
            BsonType::Alias(s) => Value::String(s),
            BsonType::Code(c) => Value::from(c),
        }
    }
}

/// `$text` search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSearch {
    search: String,
    language: Option<String>,
    case_sensitive: Option<bool>,
    diacritic_sensitive: Option<bool>,
}

impl TextSearch {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            language: None,
            case_sensitive: None,
            diacritic_sensitive: None,
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn case_sensitive(mut self, on: bool) -> Self {
        self.case_sensitive = Some(on);
        self
    }

    pub fn diacritic_sensitive(mut self, on: bool) -> Self {
        self.diacritic_sensitive = Some(on);
        self
    }

    fn to_value(&self) -> Value {
        Value::Object(
            Document::new()
                .with("$search", self.search.as_str())
                .with_opt("$language", self.language.clone())
                .with_opt("$caseSensitive", self.case_sensitive)
                .with_opt("$diacriticSensitive", self.diacritic_sensitive),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOp {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),

    Exists(bool),
    Type(OneOrMany<BsonType>),

    ElemMatch(Document),
    Size(u64),
    All(Vec<Value>),

    /// Renders `$regex` and `$options` as sibling keys.
    Regex {
        pattern: String,
        options: Option<String>,
    },

    BitsAllClear(OneOrMany<i64>),
    BitsAllSet(OneOrMany<i64>),
    BitsAnyClear(OneOrMany<i64>),
    BitsAnySet(OneOrMany<i64>),

    GeoIntersects(Document),
    GeoWithin(GeoWithin),
    Near(Near),
    NearSphere(Near),

    Mod {
        divisor: i64,
        remainder: i64,
    },
    JsonSchema(Document),
    Where(String),
    Text(TextSearch),

    And(Vec<Document>),
    Or(Vec<Document>),
    Nor(Vec<Document>),
    Not(Document),
    Expr(Expr),
}

impl QueryOp {
    pub fn eq(v: impl Into<Value>) -> Self {
        QueryOp::Eq(v.into())
    }

    pub fn ne(v: impl Into<Value>) -> Self {
        QueryOp::Ne(v.into())
    }

    pub fn gt(v: impl Into<Value>) -> Self {
        QueryOp::Gt(v.into())
    }

    pub fn gte(v: impl Into<Value>) -> Self {
        QueryOp::Gte(v.into())
    }

    pub fn lt(v: impl Into<Value>) -> Self {
        QueryOp::Lt(v.into())
    }

    pub fn lte(v: impl Into<Value>) -> Self {
        QueryOp::Lte(v.into())
    }

    pub fn in_<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        QueryOp::In(values.into_iter().map(Into::into).collect())
    }

    pub fn nin<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        QueryOp::Nin(values.into_iter().map(Into::into).collect())
    }

    pub fn exists(exists: bool) -> Self {
        QueryOp::Exists(exists)
    }

    pub fn bson_type(t: impl Into<BsonType>) -> Self {
        QueryOp::Type(OneOrMany::One(t.into()))
    }

    pub fn bson_types<I, T>(types: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<BsonType>,
    {
        let types: Vec<BsonType> = types.into_iter().map(Into::into).collect();
        if types.is_empty() {
            return Err(Error::missing("$type requires at least one type"));
        }
        Ok(QueryOp::Type(OneOrMany::Many(types)))
    }

    pub fn elem_match(conditions: impl Into<Document>) -> Self {
        QueryOp::ElemMatch(conditions.into())
    }

    pub fn size(len: u64) -> Self {
        QueryOp::Size(len)
    }

    pub fn all<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        QueryOp::All(values.into_iter().map(Into::into).collect())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        QueryOp::Regex {
            pattern: pattern.into(),
            options: None,
        }
    }

    /// Empty `options` render the same as [`QueryOp::regex`].
    pub fn regex_with(pattern: impl Into<String>, options: impl Into<String>) -> Self {
        let options: String = options.into();
        QueryOp::Regex {
            pattern: pattern.into(),
            options: (!options.is_empty()).then_some(options),
        }
    }

    pub fn bits_all_clear(mask: impl Into<OneOrMany<i64>>) -> Self {
        QueryOp::BitsAllClear(mask.into())
    }

    pub fn bits_all_set(mask: impl Into<OneOrMany<i64>>) -> Self {
        QueryOp::BitsAllSet(mask.into())
    }

    pub fn bits_any_clear(mask: impl Into<OneOrMany<i64>>) -> Self {
        QueryOp::BitsAnyClear(mask.into())
    }

    pub fn bits_any_set(mask: impl Into<OneOrMany<i64>>) -> Self {
        QueryOp::BitsAnySet(mask.into())
    }

    pub fn geo_intersects(geometry: Document) -> Self {
        QueryOp::GeoIntersects(geometry)
    }

    pub fn geo_within(shape: GeoWithin) -> Result<Self> {
        shape.validate()?;
        Ok(QueryOp::GeoWithin(shape))
    }

    pub fn near(near: Near) -> Result<Self> {
        near.validate()?;
        Ok(QueryOp::Near(near))
    }

    pub fn near_sphere(near: Near) -> Result<Self> {
        near.validate()?;
        Ok(QueryOp::NearSphere(near))
    }

    pub fn modulo(divisor: i64, remainder: i64) -> Result<Self> {
        if divisor == 0 {
            return Err(Error::invalid("$mod divisor must not be zero"));
        }
        Ok(QueryOp::Mod { divisor, remainder })
    }

    pub fn json_schema(schema: Document) -> Self {
        QueryOp::JsonSchema(schema)
    }

    /// JavaScript predicate; slow, prefer `$expr`.
    pub fn where_(js: impl Into<String>) -> Self {
        QueryOp::Where(js.into())
    }

    pub fn text(search: TextSearch) -> Self {
        QueryOp::Text(search)
    }

    pub fn and<I, D>(conditions: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Document>,
    {
        QueryOp::And(conditions.into_iter().map(Into::into).collect())
    }

    pub fn or<I, D>(conditions: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Document>,
    {
        QueryOp::Or(conditions.into_iter().map(Into::into).collect())
    }

    pub fn nor<I, D>(conditions: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Document>,
    {
        QueryOp::Nor(conditions.into_iter().map(Into::into).collect())
    }

    /// `{"$not": {..operator..}}`
    pub fn not(op: QueryOp) -> Self {
        QueryOp::Not(op.to_document())
    }

    pub fn expr(e: impl Into<Expr>) -> Self {
        QueryOp::Expr(e.into())
    }
}

fn documents(docs: &[Document]) -> Value {
    Value::Array(docs.iter().cloned().map(Value::Object).collect())
}

impl Operator for QueryOp {
    fn name(&self) -> &'static str {
        match self {
            QueryOp::Eq(_) => "$eq",
            QueryOp::Ne(_) => "$ne",
            QueryOp::Gt(_) => "$gt",
            QueryOp::Gte(_) => "$gte",
            QueryOp::Lt(_) => "$lt",
            QueryOp::Lte(_) => "$lte",
            QueryOp::In(_) => "$in",
            QueryOp::Nin(_) => "$nin",
            QueryOp::Exists(_) => "$exists",
            QueryOp::Type(_) => "$type",
            QueryOp::ElemMatch(_) => "$elemMatch",
            QueryOp::Size(_) => "$size",
            QueryOp::All(_) => "$all",
            QueryOp::Regex { .. } => "$regex",
            QueryOp::BitsAllClear(_) => "$bitsAllClear",
            QueryOp::BitsAllSet(_) => "$bitsAllSet",
            QueryOp::BitsAnyClear(_) => "$bitsAnyClear",
            QueryOp::BitsAnySet(_) => "$bitsAnySet",
            QueryOp::GeoIntersects(_) => "$geoIntersects",
            QueryOp::GeoWithin(_) => "$geoWithin",
            QueryOp::Near(_) => "$near",
            QueryOp::NearSphere(_) => "$nearSphere",
            QueryOp::Mod { .. } => "$mod",
            QueryOp::JsonSchema(_) => "$jsonSchema",
            QueryOp::Where(_) => "$where",
            QueryOp::Text(_) => "$text",
            QueryOp::And(_) => "$and",
            QueryOp::Or(_) => "$or",
            QueryOp::Nor(_) => "$nor",
            QueryOp::Not(_) => "$not",
            QueryOp::Expr(_) => "$expr",
        }
    }

    fn arguments(&self) -> Value {
        match self {
            QueryOp::Eq(v)
            | QueryOp::Ne(v)
            | QueryOp::Gt(v)
            | QueryOp::Gte(v)
            | QueryOp::Lt(v)
            | QueryOp::Lte(v) => v.clone(),
            QueryOp::In(vs) | QueryOp::Nin(vs) | QueryOp::All(vs) => Value::Array(vs.clone()),
            QueryOp::Exists(b) => Value::Bool(*b),
            QueryOp::Type(t) => t.clone().into_value(),
            QueryOp::ElemMatch(d) | QueryOp::JsonSchema(d) | QueryOp::Not(d) => {
                Value::Object(d.clone())
            }
            QueryOp::GeoIntersects(g) => {
                Value::Object(Document::new().with("$geometry", Value::Object(g.clone())))
            }
            QueryOp::Size(n) => Value::from(*n),
            QueryOp::Regex { pattern, .. } => Value::String(pattern.clone()),
            QueryOp::BitsAllClear(m)
            | QueryOp::BitsAllSet(m)
            | QueryOp::BitsAnyClear(m)
            | QueryOp::BitsAnySet(m) => m.clone().into_value(),
            QueryOp::GeoWithin(shape) => shape.to_value(),
            QueryOp::Near(near) | QueryOp::NearSphere(near) => near.target_value(),
            QueryOp::Mod { divisor, remainder } => {
                Value::Array(vec![Value::from(*divisor), Value::from(*remainder)])
            }
            QueryOp::Where(js) => Value::String(js.clone()),
            QueryOp::Text(t) => t.to_value(),
            QueryOp::And(ds) | QueryOp::Or(ds) | QueryOp::Nor(ds) => documents(ds),
            QueryOp::Expr(e) => e.to_value(),
        }
    }

    fn to_document(&self) -> Document {
        let doc = Document::new().with(self.name(), self.arguments());
        match self {
            QueryOp::Regex { options, .. } => doc.with_opt("$options", options.clone()),
            QueryOp::Near(near) | QueryOp::NearSphere(near) => near.append_legacy_bounds(doc),
            _ => doc,
        }
    }
}

impl From<QueryOp> for Document {
    fn from(op: QueryOp) -> Self {
        op.to_document()
    }
}

impl From<QueryOp> for Value {
    fn from(op: QueryOp) -> Self {
        Value::Object(op.to_document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggro_expr::field;
    use serde_json::json;

    fn v(op: QueryOp) -> Value {
        op.into()
    }

    #[test]
    fn test_comparison_ops() {
        assert_eq!(v(QueryOp::eq("active")), json!({"$eq": "active"}));
        assert_eq!(v(QueryOp::ne(0)), json!({"$ne": 0}));
        assert_eq!(v(QueryOp::gt(18)), json!({"$gt": 18}));
        assert_eq!(v(QueryOp::gte(18)), json!({"$gte": 18}));
        assert_eq!(v(QueryOp::lt(1.5)), json!({"$lt": 1.5}));
        assert_eq!(v(QueryOp::lte(json!(null))), json!({"$lte": null}));
        assert_eq!(v(QueryOp::in_(["a", "b"])), json!({"$in": ["a", "b"]}));
        assert_eq!(v(QueryOp::nin([1, 2])), json!({"$nin": [1, 2]}));
    }

    #[test]
    fn test_element_ops() {
        assert_eq!(v(QueryOp::exists(true)), json!({"$exists": true}));
        assert_eq!(v(QueryOp::exists(false)), json!({"$exists": false}));
        assert_eq!(v(QueryOp::bson_type("string")), json!({"$type": "string"}));
        assert_eq!(v(QueryOp::bson_type(2)), json!({"$type": 2}));
        assert_eq!(
            v(QueryOp::bson_types([BsonType::from("string"), BsonType::from(16)]).unwrap()),
            json!({"$type": ["string", 16]})
        );
        assert!(QueryOp::bson_types(Vec::<BsonType>::new()).is_err());
    }

    #[test]
    fn test_array_ops() {
        let cond = Document::new().with("score", json!({"$gt": 80}));
        assert_eq!(
            v(QueryOp::elem_match(cond)),
            json!({"$elemMatch": {"score": {"$gt": 80}}})
        );
        assert_eq!(v(QueryOp::size(3)), json!({"$size": 3}));
        assert_eq!(v(QueryOp::all(["a", "b"])), json!({"$all": ["a", "b"]}));
    }

    #[test]
    fn test_regex_has_sibling_options() {
        assert_eq!(v(QueryOp::regex("^abc")), json!({"$regex": "^abc"}));
        let doc = QueryOp::regex_with("^abc", "i").to_document();
        assert_eq!(Value::Object(doc.clone()), json!({"$regex": "^abc", "$options": "i"}));
        assert_eq!(doc.len(), 2);
        assert_eq!(v(QueryOp::regex_with("x", "")), json!({"$regex": "x"}));
    }

    #[test]
    fn test_bitwise_ops() {
        assert_eq!(v(QueryOp::bits_all_clear(35i64)), json!({"$bitsAllClear": 35}));
        assert_eq!(v(QueryOp::bits_all_set(vec![1i64, 5])), json!({"$bitsAllSet": [1, 5]}));
        assert_eq!(v(QueryOp::bits_any_clear(7i64)), json!({"$bitsAnyClear": 7}));
        assert_eq!(v(QueryOp::bits_any_set(vec![0i64])), json!({"$bitsAnySet": [0]}));
    }

    #[test]
    fn test_misc_ops() {
        assert_eq!(v(QueryOp::modulo(4, 0).unwrap()), json!({"$mod": [4, 0]}));
        assert!(QueryOp::modulo(0, 1).is_err());
        assert_eq!(
            v(QueryOp::where_("this.credits == this.debits")),
            json!({"$where": "this.credits == this.debits"})
        );
        let schema = Document::new().with("required", json!(["name"]));
        assert_eq!(
            v(QueryOp::json_schema(schema)),
            json!({"$jsonSchema": {"required": ["name"]}})
        );
        assert_eq!(
            v(QueryOp::text(TextSearch::new("coffee shop").language("en").case_sensitive(false))),
            json!({"$text": {"$search": "coffee shop", "$language": "en", "$caseSensitive": false}})
        );
    }

    #[test]
    fn test_logical_ops() {
        let a = Document::new().with("status", "active");
        let b = Document::new().with("age", json!({"$gt": 18}));
        assert_eq!(
            v(QueryOp::and([a.clone(), b.clone()])),
            json!({"$and": [{"status": "active"}, {"age": {"$gt": 18}}]})
        );
        assert_eq!(v(QueryOp::or([a])), json!({"$or": [{"status": "active"}]}));
        assert_eq!(v(QueryOp::nor([b])), json!({"$nor": [{"age": {"$gt": 18}}]}));
        assert_eq!(
            v(QueryOp::not(QueryOp::regex("^test"))),
            json!({"$not": {"$regex": "^test"}})
        );
    }

    #[test]
    fn test_expr_serializes_expression_tree() {
        assert_eq!(
            v(QueryOp::expr(field("status").eq("active"))),
            json!({"$expr": {"$eq": ["$status", "active"]}})
        );
        assert_eq!(
            v(QueryOp::expr(field("a").eq(field("b")))),
            json!({"$expr": {"$eq": ["$a", "$b"]}})
        );
    }
}
