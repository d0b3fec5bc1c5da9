//! Convenient re-exports for downstream crates.

pub use crate::config::RenderConfig;
pub use crate::document::{Document, DocumentExt, OneOrMany};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::operator::Operator;
pub use crate::sort::{SortOrder, SortSpec, ASCENDING, DESCENDING};
