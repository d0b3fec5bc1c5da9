//! Grouping beyond `$group`: `$sortByCount`, `$facet`, `$bucket`, `$bucketAuto`.

use std::fmt;

use serde_json::Value;

use aggro_core::{Document, DocumentExt, Error, Operator, Result};
use aggro_expr::{Expr, Field};
use aggro_operators::{merge_accumulators, Accumulator};

use crate::validate::output_field;

/// `{"$sortByCount": expr}`. A bare path string is treated as a field path.
#[derive(Debug, Clone, PartialEq)]
pub struct SortByCount {
    by: Expr,
}

impl SortByCount {
    pub fn new(by: impl Into<Expr>) -> Result<Self> {
        let by = match by.into() {
            Expr::Literal(Value::String(path)) => {
                if path.is_empty() {
                    return Err(Error::missing("$sortByCount field"));
                }
                Expr::Field(Field::new(path))
            }
            Expr::Literal(other) if !other.is_object() => {
                return Err(Error::invalid(
                    "$sortByCount needs a field path or expression",
                ))
            }
            e => e,
        };
        Ok(Self { by })
    }
}

impl Operator for SortByCount {
    fn name(&self) -> &'static str {
        "$sortByCount"
    }

    fn arguments(&self) -> Value {
        self.by.to_value()
    }
}

/// Stages that cannot run inside a `$facet` sub-pipeline.
const NOT_IN_FACET: &[&str] = &[
    "$collStats",
    "$facet",
    "$geoNear",
    "$indexStats",
    "$out",
    "$merge",
    "$planCacheStats",
    "$search",
    "$searchMeta",
    "$vectorSearch",
];

/// `$facet`: several named sub-pipelines over the same input.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    facets: Vec<(String, Vec<Document>)>,
}

impl Facet {
    pub fn new<I, K, P>(facets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<Vec<Document>>,
    {
        let mut out: Vec<(String, Vec<Document>)> = Vec::new();
        for (name, pipeline) in facets {
            let name = output_field(name, "$facet output name")?;
            if out.iter().any(|(n, _)| *n == name) {
                return Err(Error::conflict(format!("duplicate $facet output: {name}")));
            }
            let pipeline = pipeline.into();
            for stage in &pipeline {
                if let Some(key) = stage.keys().find(|k| NOT_IN_FACET.contains(&k.as_str())) {
                    return Err(Error::Placement(format!(
                        "{key} is not allowed inside $facet '{name}'"
                    )));
                }
            }
            out.push((name, pipeline));
        }
        if out.is_empty() {
            return Err(Error::missing("$facet needs at least one output"));
        }
        Ok(Self { facets: out })
    }
}

impl Operator for Facet {
    fn name(&self) -> &'static str {
        "$facet"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            self.facets
                .iter()
                .map(|(name, p)| (name.clone(), Value::from(p.clone())))
                .collect(),
        )
    }
}

/// `$bucket` with explicit, ascending boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    group_by: Expr,
    boundaries: Vec<Value>,
    default: Option<Value>,
    output: Option<Document>,
}

impl Bucket {
    pub fn new<I, V>(group_by: impl Into<Expr>, boundaries: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let boundaries: Vec<Value> = boundaries.into_iter().map(Into::into).collect();
        if boundaries.len() < 2 {
            return Err(Error::invalid(format!(
                "$bucket needs at least two boundaries, got {}",
                boundaries.len()
            )));
        }
        let numeric: Option<Vec<f64>> = boundaries.iter().map(Value::as_f64).collect();
        if let Some(nums) = numeric {
            if nums.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::invalid("$bucket boundaries must be strictly ascending"));
            }
        }
        Ok(Self {
            group_by: group_by.into(),
            boundaries,
            default: None,
            output: None,
        })
    }

    /// Bucket id for values outside every boundary.
    pub fn default(mut self, bucket: impl Into<Value>) -> Self {
        self.default = Some(bucket.into());
        self
    }

    pub fn output<I>(mut self, accumulators: I) -> Result<Self>
    where
        I: IntoIterator<Item = Accumulator>,
    {
        self.output = Some(merge_accumulators(accumulators)?);
        Ok(self)
    }
}

impl Operator for Bucket {
    fn name(&self) -> &'static str {
        "$bucket"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with("groupBy", &self.group_by)
                .with("boundaries", self.boundaries.clone())
                .with_opt("default", self.default.clone())
                .with_opt("output", self.output.clone()),
        )
    }
}

/// Preferred number series for `$bucketAuto` boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    R5,
    R10,
    R20,
    R40,
    R80,
    OneTwoFive,
    E6,
    E12,
    E24,
    E48,
    E96,
    E192,
    PowersOf2,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::R5 => "R5",
            Granularity::R10 => "R10",
            Granularity::R20 => "R20",
            Granularity::R40 => "R40",
            Granularity::R80 => "R80",
            Granularity::OneTwoFive => "1-2-5",
            Granularity::E6 => "E6",
            Granularity::E12 => "E12",
            Granularity::E24 => "E24",
            Granularity::E48 => "E48",
            Granularity::E96 => "E96",
            Granularity::E192 => "E192",
            Granularity::PowersOf2 => "POWERSOF2",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketAuto {
    group_by: Expr,
    buckets: i64,
    output: Option<Document>,
    granularity: Option<Granularity>,
}

impl BucketAuto {
    pub fn new(group_by: impl Into<Expr>, buckets: i64) -> Result<Self> {
        if buckets <= 0 {
            return Err(Error::invalid(format!(
                "$bucketAuto buckets must be positive, got {buckets}"
            )));
        }
        Ok(Self {
            group_by: group_by.into(),
            buckets,
            output: None,
            granularity: None,
        })
    }

    pub fn output<I>(mut self, accumulators: I) -> Result<Self>
    where
        I: IntoIterator<Item = Accumulator>,
    {
        self.output = Some(merge_accumulators(accumulators)?);
        Ok(self)
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }
}

impl Operator for BucketAuto {
    fn name(&self) -> &'static str {
        "$bucketAuto"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with("groupBy", &self.group_by)
                .with("buckets", self.buckets)
                .with_opt("output", self.output.clone())
                .with_opt("granularity", self.granularity.map(|g| g.as_str())),
        )
    }
}
