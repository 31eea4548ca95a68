//! Error types for sqltest-core

use thiserror::Error;

/// Core error type for sqltest
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Model or column definition could not be parsed
    #[error("[E004] Issue parsing model from: {input}: {reason}")]
    ModelParseError { input: String, reason: String },

    /// E005: Malformed test entry
    #[error("[E005] Invalid test definition: {message}")]
    InvalidTest { message: String },

    /// E006: No model matches the requested name
    #[error("[E006] Could not find a model matching \"{name}\"")]
    ModelNotFound { name: String },

    /// E007: `$VAR` source URL could not be resolved
    #[error("[E007] Source URL references environment variable '{key}', which is not set")]
    UnresolvedUrl { key: String },

    /// E008: IO error with path context
    #[error("[E008] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
