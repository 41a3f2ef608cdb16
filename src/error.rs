//! Error types for Lovechat
//!
//! This module defines all error types used throughout the pipeline,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Lovechat operations
///
/// This enum encompasses all possible errors that can occur while
/// processing a message: unknown users, exhausted daily quotas,
/// provider failures, storage failures, and input validation.
#[derive(Error, Debug)]
pub enum LovechatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No user record exists for the given id
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The user has exhausted their daily message quota
    ///
    /// Recoverable and user-actionable: the message carries an
    /// upgrade call-to-action for the caller to surface.
    #[error("Daily message limit reached: limit={limit}, {message}")]
    DailyLimitReached {
        /// The configured daily limit that was exhausted
        limit: u32,
        /// Upgrade prompt shown to the user
        message: String,
    },

    /// Generative provider errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider endpoint returned a non-success status
    #[error("Provider API error: status={status}, {message}")]
    ProviderApi {
        /// HTTP status code returned by the provider
        status: u16,
        /// Body or reason extracted from the response
        message: String,
    },

    /// Conversation storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic pipeline failure after the quota gate
    ///
    /// Carries an apologetic user-facing message. Callers must treat
    /// this as "unknown final state": records written before the
    /// failing step stay in place.
    #[error("Processing failed: {0}")]
    Processing(String),

    /// Malformed input, rejected before any state mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Lovechat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
