#![forbid(unsafe_code)]
//! aggro-core: shared vocabulary for the mongo-aggro crates.
//!
//! - `Error` / `Result`: construction-time validation errors.
//! - `Document`: insertion-ordered JSON object, the unit every builder renders to.
//! - `Operator`: anything that renders as a single-key `{"$name": args}` document.
//! - `SortOrder` / `SortSpec`: the 1 / -1 sort vocabulary shared by stages and expressions.
//! - `hash`, `trace`, `config`: fingerprinting, optional tracing, render settings.
//!
//! Nothing here talks to a database; the crate only describes documents.

pub mod config;
pub mod document;
pub mod error;
pub mod hash;
pub mod operator;
pub mod prelude;
pub mod sort;
pub mod trace;

pub use config::RenderConfig;
pub use document::{Document, DocumentExt, OneOrMany};
pub use error::{Error, Result};
pub use hash::Hash256;
pub use operator::Operator;
pub use sort::{SortOrder, SortSpec, ASCENDING, DESCENDING};
