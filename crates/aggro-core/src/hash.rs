//! Pipeline fingerprints.
//!
//! A fingerprint is blake3 over the exact bytes that would be sent to the
//! server: compact JSON, keys in insertion order. A typed pipeline and a
//! YAML pipeline with the same stage documents therefore share one
//! fingerprint, and reordering keys inside a stage produces a new one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    Hash256(*blake3::hash(bytes).as_bytes())
}

/// Fingerprint of any rendered value, e.g. a `Pipeline` or one stage document.
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256> {
    let bytes = serde_json::to_vec(v).map_err(|e| Error::Serde(e.to_string()))?;
    Ok(hash_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hex_is_64_chars_and_stable() {
        let a = hash_serde(&json!([{"$limit": 5}])).unwrap();
        let b = hash_serde(&json!([{"$limit": 5}])).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex().len(), 64);
        assert_eq!(a.to_string(), a.to_hex());
    }

    #[test]
    fn test_fingerprint_is_hash_of_compact_json() {
        let v = json!([{"$match": {"status": "active"}}]);
        let expected = hash_bytes(br#"[{"$match":{"status":"active"}}]"#);
        assert_eq!(hash_serde(&v).unwrap(), expected);
    }

    #[test]
    fn test_key_order_changes_the_hash() {
        let a = hash_serde(&json!({"a": 1, "b": 2})).unwrap();
        let b = hash_serde(&json!({"b": 2, "a": 1})).unwrap();
        assert_ne!(a, b);
    }
}
