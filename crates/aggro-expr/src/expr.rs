//! The aggregation expression tree and its rendering.
//!
//! Every expression operator reduces to an [`OperatorExpr`]: a `$name` plus
//! arguments in one of four wire shapes (`{}`, a bare operand, an array, or
//! a keyed document). Category modules (`arithmetic`, `string`, ...) are thin
//! constructors over this tree, so rendering lives in one place.

use std::ops::{BitAnd, BitOr, Not};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use aggro_core::{Document, SortOrder, SortSpec};

use crate::field::Field;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Rendered verbatim.
    Literal(Value),
    Field(Field),
    Array(Vec<Expr>),
    /// Ordered `key -> expression` document, e.g. `$project` specs or `$let` vars.
    Object(Vec<(String, Expr)>),
    Operator(Box<OperatorExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperatorExpr {
    pub name: &'static str,
    pub args: Args,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    /// `{"$rand": {}}`
    Empty,
    /// `{"$abs": "$x"}`
    Unary(Expr),
    /// `{"$add": ["$a", "$b"]}`
    List(Vec<Expr>),
    /// `{"$filter": {"input": ..., "cond": ...}}`
    Named(Vec<(&'static str, Expr)>),
}

impl Expr {
    pub fn operator(name: &'static str, args: Args) -> Expr {
        Expr::Operator(Box::new(OperatorExpr { name, args }))
    }

    pub fn empty(name: &'static str) -> Expr {
        Expr::operator(name, Args::Empty)
    }

    pub fn unary(name: &'static str, input: impl Into<Expr>) -> Expr {
        Expr::operator(name, Args::Unary(input.into()))
    }

    pub fn binary(name: &'static str, left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
        Expr::operator(name, Args::List(vec![left.into(), right.into()]))
    }

    pub fn list<I, E>(name: &'static str, args: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::operator(name, Args::List(args.into_iter().map(Into::into).collect()))
    }

    pub fn literal(v: impl Into<Value>) -> Expr {
        Expr::Literal(v.into())
    }

    pub fn object<I, K, E>(pairs: I) -> Expr
    where
        I: IntoIterator<Item = (K, E)>,
        K: Into<String>,
        E: Into<Expr>,
    {
        Expr::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The `$name` of an operator expression.
    pub fn operator_name(&self) -> Option<&'static str> {
        match self {
            Expr::Operator(op) => Some(op.name),
            _ => None,
        }
    }

    pub fn and(self, other: impl Into<Expr>) -> Expr {
        combine("$and", self, other.into())
    }

    pub fn or(self, other: impl Into<Expr>) -> Expr {
        combine("$or", self, other.into())
    }

    pub fn to_value(&self) -> Value {
        match self {
            Expr::Literal(v) => v.clone(),
            Expr::Field(f) => Value::from(f),
            Expr::Array(items) => Value::Array(items.iter().map(Expr::to_value).collect()),
            Expr::Object(pairs) => Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            Expr::Operator(op) => {
                let mut doc = Map::with_capacity(1);
                doc.insert(op.name.to_string(), op.args.to_value());
                Value::Object(doc)
            }
        }
    }
}

impl Args {
    pub fn to_value(&self) -> Value {
        match self {
            Args::Empty => Value::Object(Map::new()),
            Args::Unary(e) => e.to_value(),
            Args::List(items) => Value::Array(items.iter().map(Expr::to_value).collect()),
            Args::Named(pairs) => Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

/// Keyed arguments with optional entries, in wire order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Named(Vec<(&'static str, Expr)>);

impl Named {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn arg(mut self, key: &'static str, value: impl Into<Expr>) -> Self {
        self.0.push((key, value.into()));
        self
    }

    pub(crate) fn opt<V: Into<Expr>>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.0.push((key, v.into()));
        }
        self
    }

    pub(crate) fn build(self, name: &'static str) -> Expr {
        Expr::operator(name, Args::Named(self.0))
    }
}

// `$and`/`$or` splice same-kind operands so chains stay one level deep.
fn combine(name: &'static str, left: Expr, right: Expr) -> Expr {
    let mut conditions = into_conditions(name, left);
    conditions.extend(into_conditions(name, right));
    Expr::operator(name, Args::List(conditions))
}

fn into_conditions(name: &'static str, e: Expr) -> Vec<Expr> {
    match e {
        Expr::Operator(op) if op.name == name => match op.args {
            Args::List(items) => items,
            args => vec![Expr::operator(name, args)],
        },
        other => vec![other],
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        combine("$and", self, rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        combine("$or", self, rhs)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::unary("$not", self)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(s)
    }
}

impl From<Expr> for Value {
    fn from(e: Expr) -> Self {
        e.to_value()
    }
}

impl From<&Expr> for Value {
    fn from(e: &Expr) -> Self {
        e.to_value()
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Literal(v)
    }
}

impl From<Document> for Expr {
    fn from(d: Document) -> Self {
        Expr::Literal(Value::Object(d))
    }
}

impl From<Field> for Expr {
    fn from(f: Field) -> Self {
        Expr::Field(f)
    }
}

impl From<&Field> for Expr {
    fn from(f: &Field) -> Self {
        Expr::Field(f.clone())
    }
}

impl From<SortOrder> for Expr {
    fn from(o: SortOrder) -> Self {
        Expr::Literal(o.into())
    }
}

impl From<SortSpec> for Expr {
    fn from(s: SortSpec) -> Self {
        Expr::Literal(s.into())
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Literal(Value::String(s.to_string()))
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Value::String(s))
    }
}

impl<T: Into<Expr>> From<Vec<T>> for Expr {
    fn from(items: Vec<T>) -> Self {
        Expr::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Expr>> From<Option<T>> for Expr {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Expr::Literal(Value::Null))
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::Literal(Value::from(v))
                }
            }
        )*
    };
}

literal_from!(bool, i32, i64, u32, u64, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::field;
    use serde_json::json;

    #[test]
    fn test_and_flattens_chains() {
        let e = field("a").eq(1) & field("b").gt(2) & field("c").lt(3);
        assert_eq!(
            e.to_value(),
            json!({"$and": [
                {"$eq": ["$a", 1]},
                {"$gt": ["$b", 2]},
                {"$lt": ["$c", 3]}
            ]})
        );
    }

    #[test]
    fn test_and_flattens_right_operand() {
        let left = field("a").eq(1);
        let right = field("b").eq(2) & field("c").eq(3);
        let e = left & right;
        assert_eq!(e.to_value()["$and"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_mixed_chain_keeps_inner_or() {
        let e = field("a").eq(1) & (field("b").eq(2) | field("c").eq(3));
        assert_eq!(
            e.to_value(),
            json!({"$and": [
                {"$eq": ["$a", 1]},
                {"$or": [{"$eq": ["$b", 2]}, {"$eq": ["$c", 3]}]}
            ]})
        );
    }

    #[test]
    fn test_or_flattens_chains() {
        let e = field("x").eq(1) | field("x").eq(2) | field("x").eq(3);
        assert_eq!(e.to_value()["$or"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_not_is_unary() {
        let e = !field("deleted").eq(true);
        assert_eq!(e.to_value(), json!({"$not": {"$eq": ["$deleted", true]}}));
    }

    #[test]
    fn test_method_forms_match_operators() {
        let a = field("a").eq(1).and(field("b").eq(2));
        let b = field("a").eq(1) & field("b").eq(2);
        assert_eq!(a, b);
        let c = field("a").eq(1).or(field("b").eq(2));
        assert_eq!(c.operator_name(), Some("$or"));
    }

    #[test]
    fn test_literals_and_containers() {
        assert_eq!(Expr::from("x").to_value(), json!("x"));
        assert_eq!(Expr::from(None::<i64>).to_value(), json!(null));
        assert_eq!(Expr::from(vec![1, 2]).to_value(), json!([1, 2]));
        assert_eq!(
            Expr::object([("total", Expr::from(field("amount"))), ("one", 1.into())]).to_value(),
            json!({"total": "$amount", "one": 1})
        );
        assert_eq!(Expr::empty("$rand").to_value(), json!({"$rand": {}}));
    }

    #[test]
    fn test_serialize_matches_to_value() {
        let e = field("a").gte(5);
        assert_eq!(serde_json::to_value(&e).unwrap(), e.to_value());
        assert_eq!(json!({"$expr": e.clone()}), json!({"$expr": {"$gte": ["$a", 5]}}));
    }
}
