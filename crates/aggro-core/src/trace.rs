//! Tracing hooks.
//!
//! Compiled to no-ops unless the `tracing` feature is on; subscribers are
//! installed by the binary layer.

#[cfg(feature = "tracing")]
pub fn emit_event(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::span!(tracing::Level::DEBUG, "mongo_aggro", event);
    let _guard = span.enter();
    for (k, v) in key_values {
        tracing::debug!(%k, %v, "{}", event);
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_event(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}
