#![forbid(unsafe_code)]
//! aggro-operators: the query-language side of a pipeline.
//!
//! - [`QueryOp`]: predicates such as `{"$gte": 18}` or `{"$regex": .., "$options": ..}`
//!   used inside `$match`.
//! - [`Query`]: an ordered filter document assembled from field predicates.
//! - [`Accumulator`]: `$group` outputs (`{"total": {"$sum": "$amount"}}`).

pub mod accumulator;
pub mod query;

pub use accumulator::{merge_accumulators, validate_output_name, Accumulator, AccumulatorBuilder};
pub use query::geo::{GeoWithin, Near};
pub use query::{BsonType, Query, QueryOp, TextSearch};
