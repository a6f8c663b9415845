/// Convenience result type used across configuration, path resolution and the CLI.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

#[derive(thiserror::Error, Debug)]
/// Top-level error type for fallible, non-preload operations.
pub enum SlidecastError {
    /// Input failed validation (bad path, malformed key).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidecastError {
    /// Build a [`SlidecastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlidecastError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Failure reported by a [`crate::MediaSource`] for a single resource.
///
/// Never surfaced to preload callers: the loader logs it and resolves with `None`.
pub enum LoadError {
    /// The resource bytes could not be read.
    #[error("failed to read '{src}': {message}")]
    Io {
        /// Resource key.
        src: String,
        /// Underlying reason.
        message: String,
    },

    /// The resource was read but is not a valid image/audio payload.
    #[error("failed to decode '{src}': {message}")]
    Decode {
        /// Resource key.
        src: String,
        /// Underlying reason.
        message: String,
    },

    /// The key cannot be mapped to a location under the media root.
    #[error("invalid resource key '{src}': {reason}")]
    InvalidKey {
        /// Resource key.
        src: String,
        /// Which rule the key breaks.
        reason: &'static str,
    },

    /// The resource format is not one the source knows how to play.
    #[error("unsupported media '{src}'")]
    Unsupported {
        /// Resource key.
        src: String,
    },
}

impl LoadError {
    /// Build a [`LoadError::Io`] value.
    pub fn io(src: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            src: src.into(),
            message: message.into(),
        }
    }

    /// Build a [`LoadError::Decode`] value.
    pub fn decode(src: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            src: src.into(),
            message: message.into(),
        }
    }

    /// Build a [`LoadError::Unsupported`] value.
    pub fn unsupported(src: impl Into<String>) -> Self {
        Self::Unsupported { src: src.into() }
    }

    /// Resource key the failure refers to.
    pub fn src(&self) -> &str {
        match self {
            Self::Io { src, .. }
            | Self::Decode { src, .. }
            | Self::InvalidKey { src, .. }
            | Self::Unsupported { src } => src,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Rejection delivered to preload callers.
///
/// Load failures are not rejections; only requests that will never be served are.
pub enum PreloadError {
    /// The request was removed from the queue before it was admitted.
    #[error("preload of '{src}' was cancelled")]
    Cancelled {
        /// Resource key.
        src: String,
    },

    /// The executor driving loads went away before the request settled.
    #[error("preload of '{src}' was dropped by its executor")]
    Shutdown {
        /// Resource key.
        src: String,
    },
}

impl PreloadError {
    /// `true` for [`PreloadError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
