/// Convenience result type used across mapstitch.
pub type StitchResult<T> = Result<T, StitchError>;

/// Top-level error taxonomy used by the capture pipeline.
#[derive(thiserror::Error, Debug)]
pub enum StitchError {
    /// The upstream protocol version is outside the supported range.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Malformed or incomplete boundary payload data.
    #[error("payload error: {0}")]
    Payload(String),

    /// A color index with no palette entry was hit during decode.
    #[error("palette error: {0}")]
    Palette(String),

    /// Internal capture invariant violated during layout or assembly.
    #[error("capture error: {0}")]
    Capture(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StitchError {
    /// Build a [`StitchError::Protocol`] value.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Build a [`StitchError::Payload`] value.
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    /// Build a [`StitchError::Palette`] value.
    pub fn palette(msg: impl Into<String>) -> Self {
        Self::Palette(msg.into())
    }

    /// Build a [`StitchError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
