//! `$group` accumulators.
//!
//! An accumulator is an output name bound to an accumulator expression:
//! `{"total": {"$sum": "$amount"}}`. Most accumulators take one argument,
//! given either as a field path ([`AccumulatorBuilder::field`]) or as an
//! arbitrary expression ([`AccumulatorBuilder::value`]).

use serde_json::Value;

use aggro_core::{Document, Error, Result, SortSpec};
use aggro_expr::{window, Args, Expr, Field};

#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    name: String,
    expr: Expr,
}

/// First half of a single-argument accumulator; supply the argument to finish.
#[derive(Debug, Clone)]
#[must_use]
pub struct AccumulatorBuilder {
    name: String,
    op: &'static str,
}

impl AccumulatorBuilder {
    /// Field path argument; a `$` prefix is added when missing.
    pub fn field(self, path: impl AsRef<str>) -> Accumulator {
        self.value(Field::new(path))
    }

    /// Literal or expression argument, e.g. `1` for counting.
    pub fn value(self, v: impl Into<Expr>) -> Accumulator {
        Accumulator {
            name: self.name,
            expr: Expr::unary(self.op, v),
        }
    }
}

macro_rules! single_arg {
    ($($fn_name:ident => $op:literal),* $(,)?) => {
        $(
            pub fn $fn_name(name: impl Into<String>) -> AccumulatorBuilder {
                AccumulatorBuilder {
                    name: name.into(),
                    op: $op,
                }
            }
        )*
    };
}

impl Accumulator {
    /// Any accumulator expression under `name`, for operators without a helper.
    pub fn new(name: impl Into<String>, expr: impl Into<Expr>) -> Self {
        Self {
            name: name.into(),
            expr: expr.into(),
        }
    }

    single_arg!(
        sum => "$sum",
        avg => "$avg",
        min => "$min",
        max => "$max",
        first => "$first",
        last => "$last",
        push => "$push",
        add_to_set => "$addToSet",
        std_dev_pop => "$stdDevPop",
        std_dev_samp => "$stdDevSamp",
        merge_objects => "$mergeObjects",
    );

    /// `{name: {"$count": {}}}`
    pub fn count(name: impl Into<String>) -> Self {
        Self::new(name, Expr::empty("$count"))
    }

    pub fn top_n(
        name: impl Into<String>,
        n: impl Into<Expr>,
        sort_by: SortSpec,
        output: impl Into<Expr>,
    ) -> Self {
        Self::new(name, window::top_n(n, sort_by, output))
    }

    pub fn bottom_n(
        name: impl Into<String>,
        n: impl Into<Expr>,
        sort_by: SortSpec,
        output: impl Into<Expr>,
    ) -> Self {
        Self::new(name, window::bottom_n(n, sort_by, output))
    }

    pub fn first_n(name: impl Into<String>, n: impl Into<Expr>, input: impl Into<Expr>) -> Self {
        Self::n_of(name, "$firstN", n.into(), input.into())
    }

    pub fn last_n(name: impl Into<String>, n: impl Into<Expr>, input: impl Into<Expr>) -> Self {
        Self::n_of(name, "$lastN", n.into(), input.into())
    }

    pub fn max_n(name: impl Into<String>, n: impl Into<Expr>, input: impl Into<Expr>) -> Self {
        Self::n_of(name, "$maxN", n.into(), input.into())
    }

    pub fn min_n(name: impl Into<String>, n: impl Into<Expr>, input: impl Into<Expr>) -> Self {
        Self::n_of(name, "$minN", n.into(), input.into())
    }

    // Group accumulators put `n` before `input`, unlike the array expressions.
    fn n_of(name: impl Into<String>, op: &'static str, n: Expr, input: Expr) -> Self {
        Self::new(
            name,
            Expr::operator(op, Args::Named(vec![("n", n), ("input", input)])),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(self.name.clone(), self.expr.to_value());
        doc
    }

    /// Output names must be plain, non-dotted field names other than `_id`.
    pub fn validate(&self) -> Result<()> {
        validate_output_name(&self.name)
    }
}

pub fn validate_output_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::missing("accumulator output name"));
    }
    if name.starts_with('$') {
        return Err(Error::invalid(format!(
            "accumulator output name must not start with '$': {name}"
        )));
    }
    if name.contains('.') {
        return Err(Error::invalid(format!(
            "accumulator output name must not contain '.': {name}"
        )));
    }
    if name == "_id" {
        return Err(Error::conflict("accumulator output name '_id' is reserved for the group key"));
    }
    Ok(())
}

impl From<Accumulator> for Document {
    fn from(a: Accumulator) -> Self {
        let mut doc = Document::new();
        doc.insert(a.name, a.expr.into());
        doc
    }
}

impl From<Accumulator> for Value {
    fn from(a: Accumulator) -> Self {
        Value::Object(a.into())
    }
}

/// Merge accumulators into one ordered document, ready for `$group`.
/// Names are validated and must be unique.
pub fn merge_accumulators<I>(accumulators: I) -> Result<Document>
where
    I: IntoIterator<Item = Accumulator>,
{
    let mut out = Document::new();
    for acc in accumulators {
        acc.validate()?;
        if out.contains_key(&acc.name) {
            return Err(Error::conflict(format!(
                "duplicate accumulator output name: {}",
                acc.name
            )));
        }
        out.insert(acc.name, acc.expr.into());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(a: Accumulator) -> Value {
        a.into()
    }

    #[test]
    fn test_sum_field_and_value() {
        assert_eq!(
            v(Accumulator::sum("totalQuantity").field("quantity")),
            json!({"totalQuantity": {"$sum": "$quantity"}})
        );
        assert_eq!(
            v(Accumulator::sum("total").field("$amount")),
            json!({"total": {"$sum": "$amount"}})
        );
        assert_eq!(v(Accumulator::sum("count").value(1)), json!({"count": {"$sum": 1}}));
        assert_eq!(
            v(Accumulator::sum("weighted").value(0.5)),
            json!({"weighted": {"$sum": 0.5}})
        );
    }

    #[test]
    fn test_single_arg_family() {
        assert_eq!(v(Accumulator::avg("a").field("x")), json!({"a": {"$avg": "$x"}}));
        assert_eq!(v(Accumulator::min("a").field("x")), json!({"a": {"$min": "$x"}}));
        assert_eq!(v(Accumulator::max("a").field("x")), json!({"a": {"$max": "$x"}}));
        assert_eq!(v(Accumulator::first("a").field("x")), json!({"a": {"$first": "$x"}}));
        assert_eq!(v(Accumulator::last("a").field("x")), json!({"a": {"$last": "$x"}}));
        assert_eq!(
            v(Accumulator::add_to_set("uniqueTags").field("tag")),
            json!({"uniqueTags": {"$addToSet": "$tag"}})
        );
        assert_eq!(
            v(Accumulator::std_dev_pop("s").field("score")),
            json!({"s": {"$stdDevPop": "$score"}})
        );
        assert_eq!(
            v(Accumulator::std_dev_samp("s").field("score")),
            json!({"s": {"$stdDevSamp": "$score"}})
        );
        assert_eq!(
            v(Accumulator::merge_objects("merged").field("details")),
            json!({"merged": {"$mergeObjects": "$details"}})
        );
    }

    #[test]
    fn test_push_expression() {
        let shape = Expr::object([("name", "$name"), ("qty", "$quantity")]);
        assert_eq!(
            v(Accumulator::push("orderDetails").value(shape)),
            json!({"orderDetails": {"$push": {"name": "$name", "qty": "$quantity"}}})
        );
    }

    #[test]
    fn test_count() {
        assert_eq!(v(Accumulator::count("totalDocs")), json!({"totalDocs": {"$count": {}}}));
    }

    #[test]
    fn test_top_and_bottom_n() {
        assert_eq!(
            v(Accumulator::top_n("top3", 3, SortSpec::new().desc("score"), "$item")),
            json!({"top3": {"$topN": {"n": 3, "sortBy": {"score": -1}, "output": "$item"}}})
        );
        assert_eq!(
            v(Accumulator::bottom_n("bottom3", 3, SortSpec::new().desc("score"), "$item")),
            json!({"bottom3": {"$bottomN": {"n": 3, "sortBy": {"score": -1}, "output": "$item"}}})
        );
    }

    #[test]
    fn test_n_family_puts_n_first() {
        assert_eq!(
            v(Accumulator::first_n("first3", 3, "$item")),
            json!({"first3": {"$firstN": {"n": 3, "input": "$item"}}})
        );
        assert_eq!(
            v(Accumulator::last_n("last3", 3, "$item")),
            json!({"last3": {"$lastN": {"n": 3, "input": "$item"}}})
        );
        assert_eq!(
            v(Accumulator::max_n("top3Scores", 3, "$score")),
            json!({"top3Scores": {"$maxN": {"n": 3, "input": "$score"}}})
        );
        assert_eq!(
            v(Accumulator::min_n("lowest3", 3, "$score")),
            json!({"lowest3": {"$minN": {"n": 3, "input": "$score"}}})
        );
    }

    #[test]
    fn test_merge_accumulators_preserves_order() {
        let merged = merge_accumulators([
            Accumulator::sum("c").value(3),
            Accumulator::sum("a").value(1),
            Accumulator::count("b"),
        ])
        .unwrap();
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        assert_eq!(
            Value::Object(merged),
            json!({"c": {"$sum": 3}, "a": {"$sum": 1}, "b": {"$count": {}}})
        );
    }

    #[test]
    fn test_merge_accumulators_empty() {
        assert!(merge_accumulators(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_merge_accumulators_rejects_bad_names() {
        let dup = merge_accumulators([
            Accumulator::sum("total").value(1),
            Accumulator::avg("total").field("x"),
        ]);
        assert!(matches!(dup, Err(Error::Conflict(_))));
        assert!(merge_accumulators([Accumulator::count("")]).is_err());
        assert!(merge_accumulators([Accumulator::count("$x")]).is_err());
        assert!(merge_accumulators([Accumulator::count("a.b")]).is_err());
        assert!(merge_accumulators([Accumulator::count("_id")]).is_err());
    }
}
