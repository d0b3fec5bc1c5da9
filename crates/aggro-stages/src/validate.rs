//! Argument checks shared by stage constructors.

use serde_json::Value;

use aggro_core::document::require_document;
use aggro_core::{Document, Error, Result};
use aggro_expr::Expr;

/// Collection, database and output names.
pub(crate) fn non_empty(value: impl Into<String>, what: &str) -> Result<String> {
    let value = value.into();
    if value.is_empty() {
        return Err(Error::missing(what.to_string()));
    }
    Ok(value)
}

/// A new top-level field name: no `$` prefix and no `.` path separator.
pub(crate) fn output_field(value: impl Into<String>, what: &str) -> Result<String> {
    let value = non_empty(value, what)?;
    if value.starts_with('$') {
        return Err(Error::invalid(format!(
            "{what} must not start with '$': {value}"
        )));
    }
    if value.contains('.') {
        return Err(Error::invalid(format!("{what} must not contain '.': {value}")));
    }
    Ok(value)
}

/// A field path a stage writes into: no `$` prefix. Dots address embedded
/// fields.
pub(crate) fn target_path(value: impl Into<String>, what: &str) -> Result<String> {
    let value = non_empty(value, what)?;
    if value.starts_with('$') {
        return Err(Error::invalid(format!(
            "{what} must not start with '$': {value}"
        )));
    }
    Ok(value)
}

/// Non-empty document, e.g. a `$project` or `$addFields` specification.
pub(crate) fn spec_document(value: impl Into<Value>, what: &str) -> Result<Document> {
    let doc = require_document(value.into(), what)?;
    if doc.is_empty() {
        return Err(Error::missing(format!("{what} must have at least one field")));
    }
    Ok(doc)
}

/// Expressions that can evaluate to a document: field paths, variables,
/// operators and object literals. Plain scalars cannot.
pub(crate) fn document_expr(e: Expr, what: &str) -> Result<Expr> {
    match &e {
        Expr::Field(_) | Expr::Object(_) | Expr::Operator(_) => Ok(e),
        Expr::Literal(Value::Object(_)) => Ok(e),
        Expr::Literal(Value::String(s)) if s.starts_with('$') => Ok(e),
        Expr::Literal(v) => Err(Error::invalid(format!(
            "{what} must resolve to a document, got {}",
            aggro_core::document::value_kind(v)
        ))),
        Expr::Array(_) => Err(Error::invalid(format!(
            "{what} must resolve to a document, got array"
        ))),
    }
}
