/// Result alias used across the crate.
pub type ThumbResult<T> = Result<T, ThumbError>;

/// Error type shared by the compositor, the stores and the content backend contract.
///
/// Display prefixes are stable; the view layer shows them to the user as-is.
#[derive(thiserror::Error, Debug)]
pub enum ThumbError {
    /// Invalid option values or malformed input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Background image or font could not be loaded or decoded.
    #[error("asset error: {0}")]
    AssetLoad(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Final image encode failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Persisted credential/history state could not be read or written.
    #[error("store error: {0}")]
    Store(String),

    /// No credential is configured for the content backend.
    #[error("no credentials configured: add an API key in settings")]
    NoCredentials,

    /// The content backend rejected the request on content-policy grounds. Never retried.
    #[error("content policy violation: {0}")]
    ContentPolicy(String),

    /// Any other content backend failure.
    #[error("backend error: {0}")]
    Backend(String),

    /// The content backend answered with a payload that does not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Wrapped third-party error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbError {
    /// Build a [`ThumbError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ThumbError::AssetLoad`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`ThumbError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ThumbError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ThumbError::Store`].
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Build a [`ThumbError::Backend`].
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Build a [`ThumbError::ContentPolicy`].
    pub fn content_policy(msg: impl Into<String>) -> Self {
        Self::ContentPolicy(msg.into())
    }

    /// Build a [`ThumbError::Parse`].
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
