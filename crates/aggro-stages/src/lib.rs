#![forbid(unsafe_code)]
//! aggro-stages: aggregation stages and the pipeline that orders them.
//!
//! Every stage type validates its input when constructed and renders as a
//! single-key `{"$stage": ...}` document through [`Operator`]. The [`Stage`]
//! enum wraps all of them, plus hand-written documents via [`Stage::raw`].
//!
//! ```
//! use aggro_stages::{Limit, Match, Pipeline, Sort};
//! use aggro_core::SortSpec;
//! use serde_json::json;
//!
//! let mut pipeline = Pipeline::new();
//! pipeline
//!     .add_stage(Match::new(json!({"status": "active"})).unwrap())
//!     .add_stage(Sort::new(SortSpec::new().desc("createdAt")).unwrap())
//!     .add_stage(Limit::new(10).unwrap());
//!
//! assert_eq!(
//!     serde_json::to_value(&pipeline).unwrap(),
//!     json!([
//!         {"$match": {"status": "active"}},
//!         {"$sort": {"createdAt": -1}},
//!         {"$limit": 10}
//!     ])
//! );
//! ```

pub use aggro_core::Operator;

pub mod array;
pub mod change;
pub mod common;
pub mod dsl;
pub mod geo;
pub mod group;
pub mod join;
pub mod misc;
pub mod output;
pub mod pipeline;
pub mod search;
pub mod session;
pub mod stage;
pub mod stats;
pub mod transform;
pub mod window;

mod validate;

pub use crate::array::Unwind;
pub use crate::change::{
    ChangeStream, ChangeStreamSplitLargeEvent, FullDocument, FullDocumentBeforeChange, ResumeFrom,
};
pub use crate::common::{Count, Group, Limit, Match, Project, Skip, Sort};
pub use crate::dsl::{parse_yaml_pipeline, ParsedPipeline, PipelineConfig};
pub use crate::geo::GeoNear;
pub use crate::group::{Bucket, BucketAuto, Facet, Granularity, SortByCount};
pub use crate::join::{GraphLookup, Lookup, UnionWith};
pub use crate::misc::{ListClusterCatalog, QuerySettings};
pub use crate::output::{Documents, Merge, Out, Sample, WhenMatched, WhenNotMatched};
pub use crate::pipeline::Pipeline;
pub use crate::search::{
    ListSearchIndexes, RankFusion, Search, SearchMeta, SearchOperator, VectorSearch,
};
pub use crate::session::{ListLocalSessions, ListSampledQueries, ListSessions, SessionUser};
pub use crate::stage::{RawStage, Stage};
pub use crate::stats::{CollStats, CurrentOp, IndexStats, PlanCacheStats};
pub use crate::transform::{AddFields, Redact, ReplaceRoot, ReplaceWith, Set, Unset};
pub use crate::window::{
    Densify, DensifyBounds, DensifyRange, Fill, FillOutput, SetWindowFields, Window, WindowBound,
    WindowOutput,
};
