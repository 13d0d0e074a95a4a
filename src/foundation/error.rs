/// Result alias used throughout the crate.
pub type CountdownResult<T> = Result<T, CountdownError>;

/// Error type for countdown generation.
///
/// Variants map onto the failure classes of a generation call: a bad target time is a
/// precondition failure (`Time`), unreadable inputs are resource failures (`Asset`), and
/// anything that goes wrong while painting or writing the GIF is `Render` / `Encode`.
#[derive(thiserror::Error, Debug)]
pub enum CountdownError {
    /// Missing or unparseable target time.
    #[error("time error: {0}")]
    Time(String),

    /// Background image or font could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// The GIF stream could not be opened, written or finalized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid value at an API boundary.
    #[error("validation error: {0}")]
    Validation(String),

    /// Any other error, with context attached via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CountdownError {
    /// Build a [`CountdownError::Time`].
    pub fn time(msg: impl Into<String>) -> Self {
        Self::Time(msg.into())
    }

    /// Build a [`CountdownError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CountdownError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CountdownError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CountdownError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
