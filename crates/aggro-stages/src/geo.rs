use serde_json::{json, Value};

use aggro_core::document::require_document;
use aggro_core::{Document, DocumentExt, Error, Operator, Result};

use crate::validate::non_empty;

/// `$geoNear`: documents ordered by distance from a point.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoNear {
    near: Value,
    distance_field: String,
    spherical: Option<bool>,
    max_distance: Option<f64>,
    min_distance: Option<f64>,
    query: Option<Document>,
    distance_multiplier: Option<f64>,
    include_locs: Option<String>,
    key: Option<String>,
}

impl GeoNear {
    /// GeoJSON point `{"type": "Point", "coordinates": [lng, lat]}`.
    pub fn point(lng: f64, lat: f64, distance_field: impl Into<String>) -> Result<Self> {
        Self::new(
            json!({"type": "Point", "coordinates": [lng, lat]}),
            distance_field,
        )
    }

    /// Legacy coordinate pair `[x, y]`.
    pub fn legacy(x: f64, y: f64, distance_field: impl Into<String>) -> Result<Self> {
        Self::new(json!([x, y]), distance_field)
    }

    /// `near` must be a GeoJSON point document or a two-number array.
    pub fn new(near: impl Into<Value>, distance_field: impl Into<String>) -> Result<Self> {
        let near = near.into();
        match &near {
            Value::Object(_) => {}
            Value::Array(xy) if xy.len() == 2 && xy.iter().all(Value::is_number) => {}
            other => {
                return Err(Error::invalid(format!(
                    "$geoNear near must be a GeoJSON point or [x, y], got {other}"
                )))
            }
        }
        Ok(Self {
            near,
            distance_field: non_empty(distance_field, "$geoNear distanceField")?,
            spherical: None,
            max_distance: None,
            min_distance: None,
            query: None,
            distance_multiplier: None,
            include_locs: None,
            key: None,
        })
    }

    pub fn spherical(mut self, on: bool) -> Self {
        self.spherical = Some(on);
        self
    }

    pub fn max_distance(mut self, d: f64) -> Result<Self> {
        check_distance(d)?;
        if let Some(min) = self.min_distance {
            check_order(min, d)?;
        }
        self.max_distance = Some(d);
        Ok(self)
    }

    pub fn min_distance(mut self, d: f64) -> Result<Self> {
        check_distance(d)?;
        if let Some(max) = self.max_distance {
            check_order(d, max)?;
        }
        self.min_distance = Some(d);
        Ok(self)
    }

    /// Pre-filter using query syntax; `$near` is not allowed inside.
    pub fn query(mut self, query: impl Into<Value>) -> Result<Self> {
        let query = require_document(query.into(), "$geoNear query")?;
        if query.contains_key("$near") || query.values().any(has_near) {
            return Err(Error::invalid("$geoNear query cannot use $near"));
        }
        self.query = Some(query);
        Ok(self)
    }

    pub fn distance_multiplier(mut self, m: f64) -> Result<Self> {
        check_distance(m)?;
        self.distance_multiplier = Some(m);
        Ok(self)
    }

    pub fn include_locs(mut self, field: impl Into<String>) -> Result<Self> {
        self.include_locs = Some(non_empty(field, "$geoNear includeLocs")?);
        Ok(self)
    }

    /// Geospatial index field to use when several exist.
    pub fn key(mut self, field: impl Into<String>) -> Result<Self> {
        self.key = Some(non_empty(field, "$geoNear key")?);
        Ok(self)
    }
}

fn has_near(v: &Value) -> bool {
    v.as_object()
        .map(|o| o.contains_key("$near") || o.contains_key("$nearSphere"))
        .unwrap_or(false)
}

fn check_distance(d: f64) -> Result<()> {
    if !(d >= 0.0) {
        return Err(Error::invalid(format!("distance must be non-negative, got {d}")));
    }
    Ok(())
}

fn check_order(min: f64, max: f64) -> Result<()> {
    if min > max {
        return Err(Error::invalid(format!(
            "minDistance {min} exceeds maxDistance {max}"
        )));
    }
    Ok(())
}

impl Operator for GeoNear {
    fn name(&self) -> &'static str {
        "$geoNear"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with("near", self.near.clone())
                .with("distanceField", self.distance_field.clone())
                .with_opt("spherical", self.spherical)
                .with_opt("maxDistance", self.max_distance)
                .with_opt("minDistance", self.min_distance)
                .with_opt("query", self.query.clone())
                .with_opt("distanceMultiplier", self.distance_multiplier)
                .with_opt("includeLocs", self.include_locs.clone())
                .with_opt("key", self.key.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_near_point() {
        let g = GeoNear::point(-73.99, 40.73, "dist.calculated")
            .unwrap()
            .spherical(true)
            .max_distance(2000.0)
            .unwrap()
            .query(json!({"category": "Parks"}))
            .unwrap()
            .include_locs("dist.location")
            .unwrap();
        assert_eq!(
            Value::Object(g.to_document()),
            json!({"$geoNear": {
                "near": {"type": "Point", "coordinates": [-73.99, 40.73]},
                "distanceField": "dist.calculated",
                "spherical": true,
                "maxDistance": 2000.0,
                "query": {"category": "Parks"},
                "includeLocs": "dist.location"
            }})
        );
    }

    #[test]
    fn test_geo_near_legacy_and_options() {
        let g = GeoNear::legacy(1.0, 2.0, "d")
            .unwrap()
            .min_distance(1.0)
            .unwrap()
            .distance_multiplier(6378.1)
            .unwrap()
            .key("location")
            .unwrap();
        assert_eq!(
            g.arguments(),
            json!({
                "near": [1.0, 2.0],
                "distanceField": "d",
                "minDistance": 1.0,
                "distanceMultiplier": 6378.1,
                "key": "location"
            })
        );
    }

    #[test]
    fn test_geo_near_validation() {
        assert!(GeoNear::new(json!([1]), "d").is_err());
        assert!(GeoNear::new(json!("here"), "d").is_err());
        assert!(GeoNear::point(0.0, 0.0, "").is_err());
        let g = GeoNear::point(0.0, 0.0, "d").unwrap();
        assert!(g.clone().max_distance(-1.0).is_err());
        assert!(g
            .clone()
            .max_distance(10.0)
            .unwrap()
            .min_distance(20.0)
            .is_err());
        assert!(g
            .clone()
            .query(json!({"loc": {"$near": [0, 0]}}))
            .is_err());
        assert!(g.max_distance(f64::NAN).is_err());
    }
}
