/// Crate-wide result alias.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Error kinds surfaced by the overlay pipeline.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    /// Caller supplied unusable input (missing image, empty caption or topic, bad parameters).
    #[error("input error: {0}")]
    Input(String),

    /// Decoding, rasterization or encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// The external caption source failed or produced nothing usable.
    #[error("caption error: {0}")]
    Caption(String),

    /// Configuration could not be read or is out of range.
    #[error("config error: {0}")]
    Config(String),

    /// Context-annotated failure from lower layers.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverlayError {
    /// Build an [`OverlayError::Input`].
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build an [`OverlayError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`OverlayError::Caption`].
    pub fn caption(msg: impl Into<String>) -> Self {
        Self::Caption(msg.into())
    }

    /// Build an [`OverlayError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` for errors that should be reported back to the user without attempting a render.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
