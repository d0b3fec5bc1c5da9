//! Window and gap-filling stages: `$setWindowFields`, `$densify`, `$fill`.

use serde_json::Value;

use aggro_core::{Document, DocumentExt, Error, Operator, Result, SortSpec};
use aggro_expr::Expr;

use crate::validate::non_empty;

const TIME_UNITS: &[&str] = &[
    "year",
    "quarter",
    "month",
    "week",
    "day",
    "hour",
    "minute",
    "second",
    "millisecond",
];

fn time_unit(unit: impl Into<String>) -> Result<String> {
    let unit = unit.into();
    if !TIME_UNITS.contains(&unit.as_str()) {
        return Err(Error::invalid(format!(
            "unknown time unit '{unit}', expected one of {}",
            TIME_UNITS.join(", ")
        )));
    }
    Ok(unit)
}

/// One end of a window: `"unbounded"`, `"current"` or an offset.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowBound {
    Unbounded,
    Current,
    At(Value),
}

impl WindowBound {
    fn to_value(&self) -> Value {
        match self {
            WindowBound::Unbounded => "unbounded".into(),
            WindowBound::Current => "current".into(),
            WindowBound::At(v) => v.clone(),
        }
    }

    // Position relative to the current document; unbounded never conflicts.
    fn offset(&self) -> Option<f64> {
        match self {
            WindowBound::Unbounded => None,
            WindowBound::Current => Some(0.0),
            WindowBound::At(v) => v.as_f64(),
        }
    }
}

impl From<i64> for WindowBound {
    fn from(n: i64) -> Self {
        WindowBound::At(n.into())
    }
}

impl From<i32> for WindowBound {
    fn from(n: i32) -> Self {
        WindowBound::At(n.into())
    }
}

impl From<f64> for WindowBound {
    fn from(n: f64) -> Self {
        WindowBound::At(n.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowKind {
    Documents,
    Range,
}

/// The `window` field of a `$setWindowFields` output.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    kind: WindowKind,
    lower: WindowBound,
    upper: WindowBound,
    unit: Option<String>,
}

impl Window {
    /// `{"documents": [lower, upper]}`; offsets count documents and must be integers.
    pub fn documents(
        lower: impl Into<WindowBound>,
        upper: impl Into<WindowBound>,
    ) -> Result<Self> {
        let (lower, upper) = (lower.into(), upper.into());
        for b in [&lower, &upper] {
            if let WindowBound::At(v) = b {
                if !v.is_i64() {
                    return Err(Error::invalid(format!(
                        "documents window bounds must be integers, got {v}"
                    )));
                }
            }
        }
        Self::build(WindowKind::Documents, lower, upper, None)
    }

    /// `{"range": [lower, upper]}` over the sortBy field's values.
    pub fn range(lower: impl Into<WindowBound>, upper: impl Into<WindowBound>) -> Result<Self> {
        let (lower, upper) = (lower.into(), upper.into());
        Self::check_numeric(&lower)?;
        Self::check_numeric(&upper)?;
        Self::build(WindowKind::Range, lower, upper, None)
    }

    /// A range over dates, e.g. `[-7, 0]` days.
    pub fn time_range(
        lower: impl Into<WindowBound>,
        upper: impl Into<WindowBound>,
        unit: impl Into<String>,
    ) -> Result<Self> {
        let (lower, upper) = (lower.into(), upper.into());
        Self::check_numeric(&lower)?;
        Self::check_numeric(&upper)?;
        Self::build(WindowKind::Range, lower, upper, Some(time_unit(unit)?))
    }

    fn check_numeric(b: &WindowBound) -> Result<()> {
        match b {
            WindowBound::At(v) if !v.is_number() => Err(Error::invalid(format!(
                "range window bounds must be numbers, got {v}"
            ))),
            _ => Ok(()),
        }
    }

    fn build(
        kind: WindowKind,
        lower: WindowBound,
        upper: WindowBound,
        unit: Option<String>,
    ) -> Result<Self> {
        if let (Some(l), Some(u)) = (lower.offset(), upper.offset()) {
            if l > u {
                return Err(Error::invalid(format!(
                    "window lower bound {} is after upper bound {}",
                    lower.to_value(),
                    upper.to_value()
                )));
            }
        }
        Ok(Self {
            kind,
            lower,
            upper,
            unit,
        })
    }

    fn to_value(&self) -> Value {
        let key = match self.kind {
            WindowKind::Documents => "documents",
            WindowKind::Range => "range",
        };
        Value::Object(
            Document::new()
                .with(
                    key,
                    Value::Array(vec![self.lower.to_value(), self.upper.to_value()]),
                )
                .with_opt("unit", self.unit.clone()),
        )
    }
}

/// One `$setWindowFields` output: `{name: {"$op": ..., "window": ...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOutput {
    name: String,
    expr: Expr,
    window: Option<Window>,
}

impl WindowOutput {
    /// `expr` must be an operator such as `$sum` or `$rank`.
    pub fn new(name: impl Into<String>, expr: impl Into<Expr>) -> Result<Self> {
        let name = non_empty(name, "window output name")?;
        if name.starts_with('$') {
            return Err(Error::invalid(format!(
                "window output name must not start with '$': {name}"
            )));
        }
        let expr = expr.into();
        if expr.operator_name().is_none() {
            return Err(Error::invalid(format!(
                "window output '{name}' needs a window or accumulator operator"
            )));
        }
        Ok(Self {
            name,
            expr,
            window: None,
        })
    }

    pub fn window(mut self, window: Window) -> Self {
        self.window = Some(window);
        self
    }

    fn to_value(&self) -> Value {
        let mut spec = self.expr.to_value();
        if let (Value::Object(map), Some(w)) = (&mut spec, &self.window) {
            map.insert("window".to_string(), w.to_value());
        }
        spec
    }
}

fn unique_names<'a>(names: impl Iterator<Item = &'a str>, what: &str) -> Result<()> {
    let mut seen: Vec<&str> = Vec::new();
    for n in names {
        if seen.contains(&n) {
            return Err(Error::conflict(format!("duplicate {what}: {n}")));
        }
        seen.push(n);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetWindowFields {
    partition_by: Option<Expr>,
    sort_by: Option<SortSpec>,
    output: Vec<WindowOutput>,
}

impl SetWindowFields {
    pub fn new<I>(output: I) -> Result<Self>
    where
        I: IntoIterator<Item = WindowOutput>,
    {
        let output: Vec<WindowOutput> = output.into_iter().collect();
        if output.is_empty() {
            return Err(Error::missing("$setWindowFields needs at least one output"));
        }
        unique_names(output.iter().map(|o| o.name.as_str()), "window output")?;
        Ok(Self {
            partition_by: None,
            sort_by: None,
            output,
        })
    }

    pub fn partition_by(mut self, by: impl Into<Expr>) -> Self {
        self.partition_by = Some(by.into());
        self
    }

    pub fn sort_by(mut self, spec: SortSpec) -> Result<Self> {
        if spec.is_empty() {
            return Err(Error::missing("$setWindowFields sortBy needs at least one field"));
        }
        self.sort_by = Some(spec);
        Ok(self)
    }
}

impl Operator for SetWindowFields {
    fn name(&self) -> &'static str {
        "$setWindowFields"
    }

    fn arguments(&self) -> Value {
        let output: Document = self
            .output
            .iter()
            .map(|o| (o.name.clone(), o.to_value()))
            .collect();
        Value::Object(
            Document::new()
                .with_opt("partitionBy", self.partition_by.as_ref())
                .with_opt("sortBy", self.sort_by.clone())
                .with("output", output),
        )
    }
}

/// The `bounds` of a `$densify` range.
#[derive(Debug, Clone, PartialEq)]
pub enum DensifyBounds {
    /// Span the whole collection.
    Full,
    /// Span each partition separately.
    Partition,
    /// Explicit `[lower, upper)` values.
    Between(Value, Value),
}

impl DensifyBounds {
    fn to_value(&self) -> Value {
        match self {
            DensifyBounds::Full => "full".into(),
            DensifyBounds::Partition => "partition".into(),
            DensifyBounds::Between(l, u) => Value::Array(vec![l.clone(), u.clone()]),
        }
    }
}

/// `{step, unit?, bounds}`
#[derive(Debug, Clone, PartialEq)]
pub struct DensifyRange {
    step: Value,
    unit: Option<String>,
    bounds: DensifyBounds,
}

impl DensifyRange {
    pub fn new(step: impl Into<Value>, bounds: DensifyBounds) -> Result<Self> {
        let step = step.into();
        match step.as_f64() {
            Some(s) if s > 0.0 => {}
            _ => {
                return Err(Error::invalid(format!(
                    "$densify step must be a positive number, got {step}"
                )))
            }
        }
        Ok(Self {
            step,
            unit: None,
            bounds,
        })
    }

    /// Required when densifying a date field.
    pub fn unit(mut self, unit: impl Into<String>) -> Result<Self> {
        self.unit = Some(time_unit(unit)?);
        Ok(self)
    }

    fn to_value(&self) -> Value {
        Value::Object(
            Document::new()
                .with("step", self.step.clone())
                .with_opt("unit", self.unit.clone())
                .with("bounds", self.bounds.to_value()),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Densify {
    field: String,
    partition_by_fields: Option<Vec<String>>,
    range: DensifyRange,
}

impl Densify {
    pub fn new(field: impl Into<String>, range: DensifyRange) -> Result<Self> {
        Ok(Self {
            field: non_empty(field, "$densify field")?,
            partition_by_fields: None,
            range,
        })
    }

    pub fn partition_by_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partition_by_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

impl Operator for Densify {
    fn name(&self) -> &'static str {
        "$densify"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with("field", self.field.clone())
                .with_opt("partitionByFields", self.partition_by_fields.clone())
                .with("range", self.range.to_value()),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FillMethod {
    Value(Expr),
    Linear,
    Locf,
}

/// One `$fill` output: a constant/expression value or an interpolation method.
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutput {
    name: String,
    method: FillMethod,
}

impl FillOutput {
    pub fn value(name: impl Into<String>, value: impl Into<Expr>) -> Result<Self> {
        Self::with_method(name, FillMethod::Value(value.into()))
    }

    /// Linear interpolation; needs `sortBy` on the stage.
    pub fn linear(name: impl Into<String>) -> Result<Self> {
        Self::with_method(name, FillMethod::Linear)
    }

    /// Last observation carried forward.
    pub fn locf(name: impl Into<String>) -> Result<Self> {
        Self::with_method(name, FillMethod::Locf)
    }

    fn with_method(name: impl Into<String>, method: FillMethod) -> Result<Self> {
        Ok(Self {
            name: non_empty(name, "$fill output field")?,
            method,
        })
    }

    fn to_value(&self) -> Value {
        let doc = match &self.method {
            FillMethod::Value(e) => Document::new().with("value", e),
            FillMethod::Linear => Document::new().with("method", "linear"),
            FillMethod::Locf => Document::new().with("method", "locf"),
        };
        Value::Object(doc)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    partition_by: Option<Expr>,
    partition_by_fields: Option<Vec<String>>,
    sort_by: Option<SortSpec>,
    output: Vec<FillOutput>,
}

impl Fill {
    pub fn new<I>(output: I) -> Result<Self>
    where
        I: IntoIterator<Item = FillOutput>,
    {
        let output: Vec<FillOutput> = output.into_iter().collect();
        if output.is_empty() {
            return Err(Error::missing("$fill needs at least one output"));
        }
        unique_names(output.iter().map(|o| o.name.as_str()), "$fill output")?;
        Ok(Self {
            partition_by: None,
            partition_by_fields: None,
            sort_by: None,
            output,
        })
    }

    /// Mutually exclusive with [`Fill::partition_by_fields`].
    pub fn partition_by(mut self, by: impl Into<Expr>) -> Result<Self> {
        if self.partition_by_fields.is_some() {
            return Err(Error::conflict(
                "$fill accepts partitionBy or partitionByFields, not both",
            ));
        }
        self.partition_by = Some(by.into());
        Ok(self)
    }

    pub fn partition_by_fields<I, S>(mut self, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.partition_by.is_some() {
            return Err(Error::conflict(
                "$fill accepts partitionBy or partitionByFields, not both",
            ));
        }
        self.partition_by_fields = Some(fields.into_iter().map(Into::into).collect());
        Ok(self)
    }

    pub fn sort_by(mut self, spec: SortSpec) -> Self {
        self.sort_by = Some(spec);
        self
    }
}

impl Operator for Fill {
    fn name(&self) -> &'static str {
        "$fill"
    }

    fn arguments(&self) -> Value {
        let output: Document = self
            .output
            .iter()
            .map(|o| (o.name.clone(), o.to_value()))
            .collect();
        Value::Object(
            Document::new()
                .with_opt("partitionBy", self.partition_by.as_ref())
                .with_opt("partitionByFields", self.partition_by_fields.clone())
                .with_opt("sortBy", self.sort_by.clone())
                .with("output", output),
        )
    }
}
