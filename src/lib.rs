#![forbid(unsafe_code)]
//! mongo-aggro: typed builders for MongoDB aggregation pipelines.
//!
//! The workspace is split by layer:
//! - [`aggro_core`]: errors, ordered documents, sort directions, fingerprints.
//! - [`aggro_expr`]: field references and aggregation expressions.
//! - [`aggro_operators`]: query predicates for `$match` and `$group` accumulators.
//! - [`aggro_stages`]: every stage, the [`Pipeline`](aggro_stages::Pipeline) and the YAML loader.
//!
//! Builders only produce documents; sending them to a server is the driver's job.
//!
//! ```
//! use mongo_aggro::prelude::*;
//! use serde_json::json;
//!
//! let mut pipeline = Pipeline::new();
//! pipeline
//!     .add_stage(Match::new(Query::new().eq("status", "active")).unwrap())
//!     .add_stage(Group::new("$region", [Accumulator::sum("total").field("amount")]).unwrap());
//!
//! assert_eq!(
//!     serde_json::to_value(&pipeline).unwrap(),
//!     json!([
//!         {"$match": {"status": "active"}},
//!         {"$group": {"_id": "$region", "total": {"$sum": "$amount"}}}
//!     ])
//! );
//! ```

pub use aggro_core;
pub use aggro_expr;
pub use aggro_operators;
pub use aggro_stages;

pub mod prelude {
    pub use aggro_core::prelude::*;
    pub use aggro_expr::{field, Expr, Field};
    pub use aggro_operators::{Accumulator, Query, QueryOp};
    pub use aggro_stages::{
        AddFields, Count, Facet, Group, Limit, Lookup, Match, Pipeline, Project, ReplaceRoot,
        Set, Skip, Sort, Stage, Unset, Unwind,
    };
}
