#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The name is not a notebook under the source directory.
    #[error("Notebook not found: {0}")]
    NotFound(String),

    #[error("Conversion of {name} failed: {reason}")]
    ConversionFailed { name: String, reason: String },

    #[error("Pull from {remote}/{branch} failed: {reason}")]
    UpdateFailed {
        remote: String,
        branch: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
