//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for tripwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by protected code
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Core error type for tripwire operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid breaker configuration (threshold or timeout out of range)
    Configuration { message: String },

    /// Failure raised by the code a breaker protects
    ProtectedCall {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Environment override could not be parsed
    Environment { variable: String, message: String },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
