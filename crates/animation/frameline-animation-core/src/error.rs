//! Error types for lookups and stored data.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum AnimationError {
    #[error("animation '{animation}' not found on node '{node}'")]
    AnimationNotFound { node: String, animation: String },

    #[error("marker '{marker}' not found in animation '{animation}' on node '{node}'")]
    MarkerNotFound {
        node: String,
        animation: String,
        marker: String,
    },

    #[error("duplicate animation id '{id}'")]
    DuplicateAnimation { id: String },

    #[error("invalid keys for '{path}': {reason}")]
    InvalidKeys { path: String, reason: String },

    #[error("stored node: {0}")]
    Stored(String),
}

/// Display label for an optional animation id.
pub(crate) fn animation_label(id: Option<&str>) -> String {
    id.unwrap_or("<default>").to_string()
}
