//! Error types for plant generation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SproutError>;

#[derive(Debug, Error, PartialEq)]
pub enum SproutError {
    /// Leaf coloring has no safe default once a theme is supplied.
    #[error("theme must provide at least one leaf color")]
    EmptyPalette,

    #[error("invalid color {value:?}: {reason}")]
    InvalidColor { value: String, reason: &'static str },

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}

impl SproutError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
