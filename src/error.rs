//! Error taxonomy for the annotation engine.
//!
//! Every variant here is recovered inside the controller that detects it; the
//! engine logs it and drops the offending event. Nothing propagates to the host
//! as a panic.

/// Errors raised by geometry, path parsing, and coordinate conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    /// A transform with (near) zero determinant or zero scale was inverted or divided by.
    #[error("transform is singular (det = {det})")]
    SingularTransform { det: f64 },
    /// The host has not supplied a screen transform yet (surface not laid out).
    #[error("screen transform is not available")]
    ViewportUnavailable,
    /// Path data contained a token that is not a supported command or coordinate.
    #[error("malformed path token '{token}': {reason}")]
    MalformedPath { token: String, reason: String },
    /// A JSON snapshot could not be decoded.
    #[error("invalid snapshot: {0}")]
    Snapshot(String),
    /// A browser API the host binding relies on failed or was missing.
    #[error("host call failed: {0}")]
    Host(String),
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Snapshot(err.to_string())
    }
}

/// Errors raised while loading an [`crate::config::EditorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for the config schema.
    #[error("failed to parse editor config: {0}")]
    Json(#[from] serde_json::Error),
    /// A field parsed but holds a value the engine cannot work with.
    #[error("invalid editor config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
