use thiserror::Error;

use crate::shell::EdgeKey;

/// Top-level error type for UV overlap detection.
#[derive(Debug, Error)]
pub enum UvlapError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Sweep(#[from] SweepError),
}

/// Errors in the caller-supplied input. These abort a run before any shell is built.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no mesh provided")]
    NoMeshes,

    #[error("mesh {mesh} has no UV sets")]
    NoUvSets { mesh: String },

    #[error("UV set '{uv_set}' not found on mesh {mesh}")]
    UvSetNotFound { mesh: String, uv_set: String },
}

/// Internal invariant violations inside one sweep run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SweepError {
    #[error("edge {0} is not in the sweep status")]
    MissingStatusEntry(EdgeKey),

    #[error("sweep panicked: {0}")]
    Panicked(String),
}

/// Convenience type alias for results using [`UvlapError`].
pub type Result<T> = std::result::Result<T, UvlapError>;
