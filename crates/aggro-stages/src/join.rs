//! Stages that read from other collections: `$lookup`, `$unionWith`,
//! `$graphLookup`.
//!
//! Sub-pipelines are accepted as anything convertible to rendered stage
//! documents, so a [`crate::Pipeline`] and a `Vec<Document>` both work.

use serde_json::Value;

use aggro_core::document::require_document;
use aggro_core::{Document, DocumentExt, Operator, Result};
use aggro_expr::Expr;

use crate::validate::{non_empty, target_path};

/// `$lookup`: left outer join.
///
/// Built either as an equality join ([`Lookup::on`]) or with a sub-pipeline
/// ([`Lookup::with_pipeline`]). `localField` and `foreignField` are always
/// set together.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    from: String,
    join: Option<(String, String)>,
    let_vars: Option<Document>,
    pipeline: Option<Vec<Document>>,
    as_field: String,
}

impl Lookup {
    pub fn on(
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            from: non_empty(from, "$lookup from")?,
            join: Some((
                non_empty(local_field, "$lookup localField")?,
                non_empty(foreign_field, "$lookup foreignField")?,
            )),
            let_vars: None,
            pipeline: None,
            as_field: target_path(as_field, "$lookup as")?,
        })
    }

    pub fn with_pipeline(
        from: impl Into<String>,
        pipeline: impl Into<Vec<Document>>,
        as_field: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            from: non_empty(from, "$lookup from")?,
            join: None,
            let_vars: None,
            pipeline: Some(pipeline.into()),
            as_field: target_path(as_field, "$lookup as")?,
        })
    }

    /// Variables visible to the sub-pipeline as `$$name`.
    pub fn let_vars(mut self, vars: impl Into<Value>) -> Result<Self> {
        self.let_vars = Some(require_document(vars.into(), "$lookup let")?);
        Ok(self)
    }

    /// Equality match combined with a sub-pipeline.
    pub fn join_on(
        mut self,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
    ) -> Result<Self> {
        self.join = Some((
            non_empty(local_field, "$lookup localField")?,
            non_empty(foreign_field, "$lookup foreignField")?,
        ));
        Ok(self)
    }
}

impl Operator for Lookup {
    fn name(&self) -> &'static str {
        "$lookup"
    }

    fn arguments(&self) -> Value {
        let (local, foreign) = match &self.join {
            Some((l, f)) => (Some(l.clone()), Some(f.clone())),
            None => (None, None),
        };
        Value::Object(
            Document::new()
                .with("from", self.from.clone())
                .with("as", self.as_field.clone())
                .with_opt("localField", local)
                .with_opt("foreignField", foreign)
                .with_opt("let", self.let_vars.clone())
                .with_opt("pipeline", self.pipeline.clone()),
        )
    }
}

/// `$unionWith`: append another collection's documents.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionWith {
    collection: String,
    pipeline: Option<Vec<Document>>,
}

impl UnionWith {
    pub fn new(collection: impl Into<String>) -> Result<Self> {
        Ok(Self {
            collection: non_empty(collection, "$unionWith collection")?,
            pipeline: None,
        })
    }

    pub fn pipeline(mut self, pipeline: impl Into<Vec<Document>>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }
}

impl Operator for UnionWith {
    fn name(&self) -> &'static str {
        "$unionWith"
    }

    fn arguments(&self) -> Value {
        match &self.pipeline {
            None => Value::String(self.collection.clone()),
            Some(p) => Value::Object(
                Document::new()
                    .with("coll", self.collection.clone())
                    .with("pipeline", p.clone()),
            ),
        }
    }
}

/// `$graphLookup`: recursive search over a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLookup {
    from: String,
    start_with: Expr,
    connect_from_field: String,
    connect_to_field: String,
    as_field: String,
    max_depth: Option<u32>,
    depth_field: Option<String>,
    restrict_search_with_match: Option<Document>,
}

impl GraphLookup {
    pub fn new(
        from: impl Into<String>,
        start_with: impl Into<Expr>,
        connect_from_field: impl Into<String>,
        connect_to_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            from: non_empty(from, "$graphLookup from")?,
            start_with: start_with.into(),
            connect_from_field: non_empty(connect_from_field, "$graphLookup connectFromField")?,
            connect_to_field: non_empty(connect_to_field, "$graphLookup connectToField")?,
            as_field: target_path(as_field, "$graphLookup as")?,
            max_depth: None,
            depth_field: None,
            restrict_search_with_match: None,
        })
    }

    /// `0` means no recursion: only direct matches.
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn depth_field(mut self, name: impl Into<String>) -> Result<Self> {
        self.depth_field = Some(target_path(name, "$graphLookup depthField")?);
        Ok(self)
    }

    pub fn restrict_search_with_match(mut self, query: impl Into<Value>) -> Result<Self> {
        self.restrict_search_with_match = Some(require_document(
            query.into(),
            "$graphLookup restrictSearchWithMatch",
        )?);
        Ok(self)
    }
}

impl Operator for GraphLookup {
    fn name(&self) -> &'static str {
        "$graphLookup"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with("from", self.from.clone())
                .with("startWith", &self.start_with)
                .with("connectFromField", self.connect_from_field.clone())
                .with("connectToField", self.connect_to_field.clone())
                .with("as", self.as_field.clone())
                .with_opt("maxDepth", self.max_depth)
                .with_opt("depthField", self.depth_field.clone())
                .with_opt(
                    "restrictSearchWithMatch",
                    self.restrict_search_with_match.clone(),
                ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Match;
    use crate::Pipeline;
    use serde_json::json;

    #[test]
    fn test_lookup_equality() {
        let l = Lookup::on("products", "product_id", "_id", "product").unwrap();
        assert_eq!(
            Value::Object(l.to_document()),
            json!({"$lookup": {
                "from": "products",
                "as": "product",
                "localField": "product_id",
                "foreignField": "_id"
            }})
        );
    }

    #[test]
    fn test_lookup_pipeline_with_let() {
        let mut sub = Pipeline::new();
        sub.add_stage(Match::new(json!({"status": "active"})).unwrap());
        let l = Lookup::with_pipeline("orders", &sub, "orders")
            .unwrap()
            .let_vars(json!({"customerId": "$_id"}))
            .unwrap();
        assert_eq!(
            l.arguments(),
            json!({
                "from": "orders",
                "as": "orders",
                "let": {"customerId": "$_id"},
                "pipeline": [{"$match": {"status": "active"}}]
            })
        );
    }

    #[test]
    fn test_lookup_concise_correlated() {
        let l = Lookup::with_pipeline("stock", Vec::<Document>::new(), "stock")
            .unwrap()
            .join_on("sku", "item")
            .unwrap();
        assert_eq!(
            l.arguments(),
            json!({
                "from": "stock",
                "as": "stock",
                "localField": "sku",
                "foreignField": "item",
                "pipeline": []
            })
        );
    }

    #[test]
    fn test_lookup_validation() {
        assert!(Lookup::on("", "a", "b", "c").is_err());
        assert!(Lookup::on("x", "a", "", "c").is_err());
        assert!(Lookup::on("x", "a", "b", "").is_err());
        assert!(Lookup::with_pipeline("x", Vec::<Document>::new(), "o")
            .unwrap()
            .let_vars(json!(1))
            .is_err());
    }

    #[test]
    fn test_lookup_into_embedded_field() {
        let l = Lookup::on("inventory", "item", "sku", "details.inventory").unwrap();
        assert_eq!(l.arguments()["as"], json!("details.inventory"));
        assert!(Lookup::on("inventory", "item", "sku", "$details").is_err());

        let g = GraphLookup::new("employees", "$boss", "boss", "name", "org.chain")
            .unwrap()
            .depth_field("org.level")
            .unwrap();
        assert_eq!(g.arguments()["as"], json!("org.chain"));
        assert_eq!(g.arguments()["depthField"], json!("org.level"));
    }

    #[test]
    fn test_union_with() {
        let u = UnionWith::new("archive").unwrap();
        assert_eq!(Value::Object(u.to_document()), json!({"$unionWith": "archive"}));

        let mut sub = Pipeline::new();
        sub.add_stage(Match::new(json!({"year": 2023})).unwrap());
        let u = UnionWith::new("archive").unwrap().pipeline(sub);
        assert_eq!(
            u.arguments(),
            json!({"coll": "archive", "pipeline": [{"$match": {"year": 2023}}]})
        );
        assert!(UnionWith::new("").is_err());
    }

    #[test]
    fn test_graph_lookup() {
        let g = GraphLookup::new(
            "employees",
            "$reportsTo",
            "reportsTo",
            "name",
            "reportingHierarchy",
        )
        .unwrap()
        .max_depth(3)
        .depth_field("level")
        .unwrap();
        assert_eq!(
            Value::Object(g.to_document()),
            json!({"$graphLookup": {
                "from": "employees",
                "startWith": "$reportsTo",
                "connectFromField": "reportsTo",
                "connectToField": "name",
                "as": "reportingHierarchy",
                "maxDepth": 3,
                "depthField": "level"
            }})
        );
    }

    #[test]
    fn test_graph_lookup_restrict() {
        let g = GraphLookup::new("airports", "$nearestAirport", "connects", "airport", "dest")
            .unwrap()
            .restrict_search_with_match(json!({"open": true}))
            .unwrap();
        assert_eq!(g.arguments()["restrictSearchWithMatch"], json!({"open": true}));
    }
}
