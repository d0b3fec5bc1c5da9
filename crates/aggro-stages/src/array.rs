use serde_json::Value;

use aggro_core::{Document, DocumentExt, Error, Operator, Result};
use aggro_expr::Field;

use crate::validate::{non_empty, output_field};

/// `$unwind`: one output document per array element.
///
/// Renders the short `"$path"` form unless an option is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwind {
    path: Field,
    include_array_index: Option<String>,
    preserve_null_and_empty_arrays: Option<bool>,
}

impl Unwind {
    /// `path` may be given with or without the leading `$`.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = non_empty(path, "$unwind path")?;
        if path == "$" {
            return Err(Error::missing("$unwind path needs a field name after '$'"));
        }
        Ok(Self {
            path: Field::new(path),
            include_array_index: None,
            preserve_null_and_empty_arrays: None,
        })
    }

    /// Output field holding the element's array index.
    pub fn include_array_index(mut self, name: impl Into<String>) -> Result<Self> {
        self.include_array_index = Some(output_field(name, "includeArrayIndex")?);
        Ok(self)
    }

    pub fn preserve_null_and_empty_arrays(mut self, preserve: bool) -> Self {
        self.preserve_null_and_empty_arrays = Some(preserve);
        self
    }
}

impl Operator for Unwind {
    fn name(&self) -> &'static str {
        "$unwind"
    }

    fn arguments(&self) -> Value {
        if self.include_array_index.is_none() && self.preserve_null_and_empty_arrays.is_none() {
            return Value::from(&self.path);
        }
        Value::Object(
            Document::new()
                .with("path", &self.path)
                .with_opt("includeArrayIndex", self.include_array_index.clone())
                .with_opt(
                    "preserveNullAndEmptyArrays",
                    self.preserve_null_and_empty_arrays,
                ),
        )
    }
}
