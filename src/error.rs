//! Custom error types for rustadsbib.
//!
//! This module defines all error types used throughout the application.
//! All functions return `Result<T, AdsBibError>` instead of using `unwrap()`.

use thiserror::Error;

/// Main error type for rustadsbib operations.
///
/// Uses `thiserror` for ergonomic error handling and automatic `Display` implementation.
#[derive(Debug, Error)]
pub enum AdsBibError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// External API returned an error
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code from the API
        code: i32,
        /// Error message from API
        message: String,
    },

    /// Missing or rejected ADS API token
    #[error("Authentication error: {0}\nObtain a token at https://ui.adsabs.harvard.edu/user/settings/token and pass it via --token, ADS_API_TOKEN, or ~/.ads/dev_key")]
    Auth(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Malformed manual-injection entry
    #[error("Invalid manual injection {entry}: {reason}")]
    Injection {
        /// The offending entry, as written in the config
        entry: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Result type alias using `AdsBibError`
pub type Result<T> = std::result::Result<T, AdsBibError>;
