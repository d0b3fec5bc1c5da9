//! Array expressions.

use aggro_core::{Error, Result};

use crate::expr::{Expr, Named};

pub fn size(array: impl Into<Expr>) -> Expr {
    Expr::unary("$size", array)
}

pub fn is_array(input: impl Into<Expr>) -> Expr {
    Expr::unary("$isArray", input)
}

pub fn reverse_array(input: impl Into<Expr>) -> Expr {
    Expr::unary("$reverseArray", input)
}

pub fn array_elem_at(array: impl Into<Expr>, index: impl Into<Expr>) -> Expr {
    Expr::binary("$arrayElemAt", array, index)
}

pub fn concat_arrays<I, E>(arrays: I) -> Expr
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    Expr::list("$concatArrays", arrays)
}

/// `{"$in": [value, array]}`
pub fn in_array(value: impl Into<Expr>, array: impl Into<Expr>) -> Expr {
    Expr::binary("$in", value, array)
}

/// `{"$slice": [array, n]}`: first `n` items, or last `|n|` when negative.
pub fn slice(array: impl Into<Expr>, n: i64) -> Expr {
    Expr::binary("$slice", array, n)
}

/// `{"$slice": [array, position, n]}`; `n` must be positive in this form.
pub fn slice_from(array: impl Into<Expr>, position: i64, n: i64) -> Result<Expr> {
    if n <= 0 {
        return Err(Error::invalid(format!(
            "$slice with a position needs a positive count, got {n}"
        )));
    }
    Ok(Expr::list("$slice", [array.into(), position.into(), n.into()]))
}

/// `[start, end, step]`; step is always rendered.
pub fn range(start: impl Into<Expr>, end: impl Into<Expr>, step: i64) -> Expr {
    Expr::list("$range", [start.into(), end.into(), step.into()])
}

pub fn reduce(
    input: impl Into<Expr>,
    initial_value: impl Into<Expr>,
    in_: impl Into<Expr>,
) -> Expr {
    Named::new()
        .arg("input", input)
        .arg("initialValue", initial_value)
        .arg("in", in_)
        .build("$reduce")
}

/// `sort_by` is a [`aggro_core::SortSpec`] for documents or a
/// [`aggro_core::SortOrder`] for scalars.
pub fn sort_array(input: impl Into<Expr>, sort_by: impl Into<Expr>) -> Expr {
    Named::new()
        .arg("input", input)
        .arg("sortBy", sort_by)
        .build("$sortArray")
}

pub fn first_n(input: impl Into<Expr>, n: impl Into<Expr>) -> Expr {
    n_items("$firstN", input, n)
}

pub fn last_n(input: impl Into<Expr>, n: impl Into<Expr>) -> Expr {
    n_items("$lastN", input, n)
}

pub fn max_n(input: impl Into<Expr>, n: impl Into<Expr>) -> Expr {
    n_items("$maxN", input, n)
}

pub fn min_n(input: impl Into<Expr>, n: impl Into<Expr>) -> Expr {
    n_items("$minN", input, n)
}

fn n_items(name: &'static str, input: impl Into<Expr>, n: impl Into<Expr>) -> Expr {
    Named::new().arg("input", input).arg("n", n).build(name)
}

/// `$filter`. The element variable defaults to `this`.
#[derive(Debug, Clone)]
pub struct Filter {
    input: Expr,
    var: String,
    cond: Expr,
    limit: Option<Expr>,
}

pub fn filter(input: impl Into<Expr>, cond: impl Into<Expr>) -> Filter {
    Filter {
        input: input.into(),
        var: "this".into(),
        cond: cond.into(),
        limit: None,
    }
}

impl Filter {
    /// Name of the per-element variable (`as`), referenced as `$$name`.
    pub fn var(mut self, name: impl Into<String>) -> Self {
        self.var = name.into();
        self
    }

    pub fn limit(mut self, limit: impl Into<Expr>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

impl From<Filter> for Expr {
    fn from(f: Filter) -> Self {
        Named::new()
            .arg("input", f.input)
            .arg("as", f.var)
            .arg("cond", f.cond)
            .opt("limit", f.limit)
            .build("$filter")
    }
}

/// `$map`. The element variable defaults to `this`.
#[derive(Debug, Clone)]
pub struct MapExpr {
    input: Expr,
    var: String,
    in_: Expr,
}

pub fn map(input: impl Into<Expr>, in_: impl Into<Expr>) -> MapExpr {
    MapExpr {
        input: input.into(),
        var: "this".into(),
        in_: in_.into(),
    }
}

impl MapExpr {
    pub fn var(mut self, name: impl Into<String>) -> Self {
        self.var = name.into();
        self
    }
}

impl From<MapExpr> for Expr {
    fn from(m: MapExpr) -> Self {
        Named::new()
            .arg("input", m.input)
            .arg("as", m.var)
            .arg("in", m.in_)
            .build("$map")
    }
}

/// `$indexOfArray`: `[array, value, start?, end?]`. `end` only renders after `start`.
#[derive(Debug, Clone)]
pub struct IndexOfArray {
    array: Expr,
    value: Expr,
    start: Option<Expr>,
    end: Option<Expr>,
}

pub fn index_of_array(array: impl Into<Expr>, value: impl Into<Expr>) -> IndexOfArray {
    IndexOfArray {
        array: array.into(),
        value: value.into(),
        start: None,
        end: None,
    }
}

impl IndexOfArray {
    pub fn start(mut self, start: impl Into<Expr>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn end(mut self, end: impl Into<Expr>) -> Self {
        self.end = Some(end.into());
        self
    }
}

impl From<IndexOfArray> for Expr {
    fn from(i: IndexOfArray) -> Self {
        let mut args = vec![i.array, i.value];
        if let Some(start) = i.start {
            args.push(start);
            if let Some(end) = i.end {
                args.push(end);
            }
        }
        Expr::list("$indexOfArray", args)
    }
}
