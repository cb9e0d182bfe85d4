/// Result alias used across the crate.
pub type CardSkinResult<T> = Result<T, CardSkinError>;

/// Error type for every fallible cardskin operation.
///
/// Only [`CardSkinError::Precondition`] is fatal to an engine; the other variants are reported
/// by the operation that hit them and, inside the engine, degrade to a lower-fidelity texture.
#[derive(thiserror::Error, Debug)]
pub enum CardSkinError {
    /// Invalid options, card model data or asset paths.
    #[error("validation error: {0}")]
    Validation(String),

    /// The engine cannot operate (missing or unusable renderer).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Rasterization or composition failed.
    #[error("render error: {0}")]
    Render(String),

    /// Artwork could not be loaded or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Snapshot markup could not be built or rasterized.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, usually an IO or decode chain with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardSkinError {
    /// Build a [`CardSkinError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardSkinError::Precondition`].
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`CardSkinError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardSkinError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CardSkinError::Snapshot`].
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Build a [`CardSkinError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the engine must stop using this error's source.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

impl From<serde_json::Error> for CardSkinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
