use serde_json::Value;

use crate::document::{single, Document};

/// Anything that renders as a single-key `{"$name": arguments}` document:
/// pipeline stages and query operators.
pub trait Operator {
    /// Operator key including the leading `$`, e.g. `"$match"`.
    fn name(&self) -> &'static str;

    /// The value stored under [`Operator::name`].
    fn arguments(&self) -> Value;

    fn to_document(&self) -> Document {
        single(self.name(), self.arguments())
    }
}
