//! Core error types for scrollnudge-core.
//!
//! The taxonomy is deliberately narrow: the tracker and the scheduler are
//! deterministic, so the only fatal condition is a bad [`FeedConfig`] at
//! attach time. Degenerate geometry and timer races are normalised or
//! suppressed where they happen and never surface here.
//!
//! [`FeedConfig`]: crate::config::FeedConfig

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for scrollnudge-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The feed task behind a handle has already shut down
    #[error("Feed session is closed")]
    SessionClosed,
}

/// Configuration-specific errors.
///
/// Raised once from `attach()`; the feed instance is never created.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `min_delay_secs` exceeds `max_delay_secs`
    #[error("Invalid delay range: min_delay ({min}s) must not exceed max_delay ({max}s)")]
    DelayRangeInverted { min: f64, max: f64 },

    /// Forced trigger does not point at a feed item
    #[error("Forced trigger index {index} out of range for a feed of {item_count} items")]
    ForcedTriggerOutOfRange { index: usize, item_count: usize },

    /// Segment count must be at least one
    #[error("Invalid segment count: {0} (must be >= 1)")]
    InvalidSegmentCount(usize),

    /// Feed has no items
    #[error("Feed must contain at least one item")]
    EmptyItemList,

    /// Nudge message pool is empty
    #[error("Nudge message pool must not be empty")]
    EmptyMessagePool,

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
