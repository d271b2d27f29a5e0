/// Result alias used by the fallible edges of the crate (loading, surfaces, validation).
pub type BoneCanvasResult<T> = Result<T, BoneCanvasError>;

/// Errors raised outside the per-frame render core.
///
/// Rendering a frame never fails: unsupported attachments, degenerate triangles and malformed
/// buffers are skipped where they occur. These variants cover pose/config loading, atlas
/// decoding and surface construction.
#[derive(thiserror::Error, Debug)]
pub enum BoneCanvasError {
    /// Structurally invalid input (pose buffers, atlas regions, dimensions).
    #[error("validation error: {0}")]
    Validation(String),

    /// A texture page could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A drawing surface could not be created or read back.
    #[error("surface error: {0}")]
    Surface(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BoneCanvasError {
    /// Build a [`BoneCanvasError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`BoneCanvasError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`BoneCanvasError::Surface`].
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`BoneCanvasError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for BoneCanvasError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
