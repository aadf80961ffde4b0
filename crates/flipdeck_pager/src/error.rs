//! Pager error types

use flipdeck_core::ConfigError;
use flipdeck_platform::PlatformError;
use thiserror::Error;

/// Errors raised while constructing a pager
///
/// Input inconsistencies and edge-of-sequence drags are never errors; they
/// are ignored or treated as "no transition".
#[derive(Error, Debug)]
pub enum PagerError {
    /// The container selector matched nothing
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    /// The container exists but cannot be rendered into
    #[error("Container is not a renderable element")]
    ContainerNotRenderable,

    /// The slide selector matched nothing
    #[error("No slides found in container")]
    NoSlides,

    /// `current` does not name a slide
    #[error("Initial slide {current} out of range for {len} slide(s)")]
    CurrentOutOfRange { current: usize, len: usize },

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Host failure (e.g. an unparseable selector)
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for pager operations
pub type Result<T> = std::result::Result<T, PagerError>;
