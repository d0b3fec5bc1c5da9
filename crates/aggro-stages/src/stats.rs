//! Diagnostic stages: `$collStats`, `$indexStats`, `$planCacheStats`, `$currentOp`.

use serde_json::{json, Value};

use aggro_core::{Document, DocumentExt, Error, Operator, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollStats {
    latency_stats: Option<Document>,
    storage_stats: Option<Document>,
    count: bool,
    query_exec_stats: bool,
}

impl CollStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// `latencyStats: {histograms}`
    pub fn latency_stats(mut self, histograms: bool) -> Self {
        self.latency_stats = Some(Document::new().with("histograms", histograms));
        self
    }

    /// `storageStats: {}`, or `{scale}` to report sizes in units of `scale` bytes.
    pub fn storage_stats(mut self, scale: Option<u64>) -> Result<Self> {
        if scale == Some(0) {
            return Err(Error::invalid("storageStats scale must be positive"));
        }
        self.storage_stats = Some(Document::new().with_opt("scale", scale));
        Ok(self)
    }

    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    pub fn query_exec_stats(mut self) -> Self {
        self.query_exec_stats = true;
        self
    }
}

impl Operator for CollStats {
    fn name(&self) -> &'static str {
        "$collStats"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with_opt("latencyStats", self.latency_stats.clone())
                .with_opt("storageStats", self.storage_stats.clone())
                .with_opt("count", self.count.then(|| json!({})))
                .with_opt("queryExecStats", self.query_exec_stats.then(|| json!({}))),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats;

impl Operator for IndexStats {
    fn name(&self) -> &'static str {
        "$indexStats"
    }

    fn arguments(&self) -> Value {
        json!({})
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanCacheStats;

impl Operator for PlanCacheStats {
    fn name(&self) -> &'static str {
        "$planCacheStats"
    }

    fn arguments(&self) -> Value {
        json!({})
    }
}

/// `$currentOp`; must run against the `admin` database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentOp {
    all_users: Option<bool>,
    idle_connections: Option<bool>,
    idle_cursors: Option<bool>,
    idle_sessions: Option<bool>,
    local_ops: Option<bool>,
}

impl CurrentOp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all_users(mut self, on: bool) -> Self {
        self.all_users = Some(on);
        self
    }

    pub fn idle_connections(mut self, on: bool) -> Self {
        self.idle_connections = Some(on);
        self
    }

    pub fn idle_cursors(mut self, on: bool) -> Self {
        self.idle_cursors = Some(on);
        self
    }

    pub fn idle_sessions(mut self, on: bool) -> Self {
        self.idle_sessions = Some(on);
        self
    }

    pub fn local_ops(mut self, on: bool) -> Self {
        self.local_ops = Some(on);
        self
    }
}

impl Operator for CurrentOp {
    fn name(&self) -> &'static str {
        "$currentOp"
    }

    fn arguments(&self) -> Value {
        Value::Object(
            Document::new()
                .with_opt("allUsers", self.all_users)
                .with_opt("idleConnections", self.idle_connections)
                .with_opt("idleCursors", self.idle_cursors)
                .with_opt("idleSessions", self.idle_sessions)
                .with_opt("localOps", self.local_ops),
        )
    }
}
