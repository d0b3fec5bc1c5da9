//! Geospatial query operator arguments.

use serde_json::{json, Value};

use aggro_core::{Document, DocumentExt, Error, Result};

/// `$geoWithin` region. Exactly one shape must be set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoWithin {
    geometry: Option<Document>,
    boxed: Option<[[f64; 2]; 2]>,
    polygon: Option<Vec<[f64; 2]>>,
    center: Option<([f64; 2], f64)>,
    center_sphere: Option<([f64; 2], f64)>,
}

impl GeoWithin {
    pub fn new() -> Self {
        Self::default()
    }

    /// GeoJSON `Polygon` or `MultiPolygon`.
    pub fn geometry(mut self, geometry: Document) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Legacy `$box` from bottom-left and top-right corners.
    pub fn boxed(mut self, bottom_left: [f64; 2], top_right: [f64; 2]) -> Self {
        self.boxed = Some([bottom_left, top_right]);
        self
    }

    pub fn polygon(mut self, points: Vec<[f64; 2]>) -> Self {
        self.polygon = Some(points);
        self
    }

    /// Flat-plane circle; `radius` in coordinate units.
    pub fn center(mut self, point: [f64; 2], radius: f64) -> Self {
        self.center = Some((point, radius));
        self
    }

    /// Spherical circle; `radius` in radians.
    pub fn center_sphere(mut self, point: [f64; 2], radius: f64) -> Self {
        self.center_sphere = Some((point, radius));
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let set = [
            self.geometry.is_some(),
            self.boxed.is_some(),
            self.polygon.is_some(),
            self.center.is_some(),
            self.center_sphere.is_some(),
        ]
        .iter()
        .filter(|s| **s)
        .count();
        match set {
            0 => Err(Error::missing("$geoWithin requires a shape")),
            1 => Ok(()),
            _ => Err(Error::conflict("$geoWithin accepts exactly one shape")),
        }?;
        if let Some(points) = &self.polygon {
            if points.len() < 3 {
                return Err(Error::invalid("$polygon needs at least three points"));
            }
        }
        Ok(())
    }

    pub(crate) fn to_value(&self) -> Value {
        let circle = |(p, r): &([f64; 2], f64)| json!([p, r]);
        Value::Object(
            Document::new()
                .with_opt("$geometry", self.geometry.clone().map(Value::Object))
                .with_opt("$box", self.boxed.map(|b| json!(b)))
                .with_opt("$polygon", self.polygon.as_ref().map(|p| json!(p)))
                .with_opt("$center", self.center.as_ref().map(circle))
                .with_opt("$centerSphere", self.center_sphere.as_ref().map(circle)),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
enum NearTarget {
    Geometry(Document),
    LegacyPoint([f64; 2]),
}

/// `$near` / `$nearSphere` arguments: a GeoJSON point or a legacy `[x, y]` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Near {
    target: NearTarget,
    max_distance: Option<f64>,
    min_distance: Option<f64>,
}

impl Near {
    pub fn geometry(point: Document) -> Self {
        Self {
            target: NearTarget::Geometry(point),
            max_distance: None,
            min_distance: None,
        }
    }

    /// `{"type": "Point", "coordinates": [lng, lat]}`
    pub fn point(lng: f64, lat: f64) -> Self {
        let point = Document::new()
            .with("type", "Point")
            .with("coordinates", json!([lng, lat]));
        Self::geometry(point)
    }

    pub fn legacy(x: f64, y: f64) -> Self {
        Self {
            target: NearTarget::LegacyPoint([x, y]),
            max_distance: None,
            min_distance: None,
        }
    }

    pub fn max_distance(mut self, d: f64) -> Self {
        self.max_distance = Some(d);
        self
    }

    pub fn min_distance(mut self, d: f64) -> Self {
        self.min_distance = Some(d);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for d in [self.max_distance, self.min_distance].into_iter().flatten() {
            if !(d >= 0.0) {
                return Err(Error::invalid(format!("distance must be non-negative, got {d}")));
            }
        }
        if let (Some(min), Some(max)) = (self.min_distance, self.max_distance) {
            if min > max {
                return Err(Error::invalid(format!(
                    "$minDistance {min} exceeds $maxDistance {max}"
                )));
            }
        }
        if matches!(self.target, NearTarget::LegacyPoint(_)) && self.min_distance.is_some() {
            return Err(Error::conflict(
                "$minDistance requires a GeoJSON point, not legacy coordinates",
            ));
        }
        Ok(())
    }

    /// Value stored under `$near`.
    pub(crate) fn target_value(&self) -> Value {
        match &self.target {
            NearTarget::LegacyPoint(p) => json!(p),
            NearTarget::Geometry(g) => Value::Object(
                Document::new()
                    .with("$geometry", Value::Object(g.clone()))
                    .with_opt("$maxDistance", self.max_distance)
                    .with_opt("$minDistance", self.min_distance),
            ),
        }
    }

    /// Legacy form keeps `$maxDistance` beside `$near` rather than inside it.
    pub(crate) fn append_legacy_bounds(&self, doc: Document) -> Document {
        match self.target {
            NearTarget::LegacyPoint(_) => doc.with_opt("$maxDistance", self.max_distance),
            NearTarget::Geometry(_) => doc,
        }
    }
}
