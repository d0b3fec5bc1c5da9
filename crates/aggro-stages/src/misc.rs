use serde_json::Value;

use aggro_core::{Document, DocumentExt, Operator};

/// `$listClusterCatalog`: collections across the cluster, run on `admin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListClusterCatalog {
    shards: Option<bool>,
    balancing_configuration: Option<bool>,
}

impl ListClusterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shards(mut self, on: bool) -> Self {
        self.shards = Some(on);
        self
    }

    pub fn balancing_configuration(mut self, on: bool) -> Self {
        self.balancing_configuration = Some(on);
        self
    }
}

impl Operator for ListClusterCatalog {
    fn name(&self) -> &'static str {
        "$listClusterCatalog"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with_opt("shards", self.shards)
                .with_opt("balancingConfiguration", self.balancing_configuration),
        )
    }
}

/// `$querySettings`: persisted query settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuerySettings {
    show_debug_query_shape: Option<bool>,
}

impl QuerySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_debug_query_shape(mut self, on: bool) -> Self {
        self.show_debug_query_shape = Some(on);
        self
    }
}

impl Operator for QuerySettings {
    fn name(&self) -> &'static str {
        "$querySettings"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new().with_opt("showDebugQueryShape", self.show_debug_query_shape),
        )
    }
}
