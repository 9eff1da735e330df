//! Builder methods for creating errors with context

use super::types::{BoxError, Error};
use std::path::PathBuf;

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a protected call error carrying only a message
    #[must_use]
    pub fn protected_call(message: impl Into<String>) -> Self {
        Error::ProtectedCall {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap the error returned by protected code, keeping it as the source
    #[must_use]
    pub fn protected_call_with_source(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Error::ProtectedCall {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an environment variable error
    #[must_use]
    pub fn environment(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Environment {
            variable: variable.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// True for errors produced while validating configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// True for failures captured from protected code
    pub fn is_protected_call(&self) -> bool {
        matches!(self, Error::ProtectedCall { .. })
    }

    /// Message of a protected call failure, without the display prefix
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Error::ProtectedCall { message, .. } => Some(message),
            _ => None,
        }
    }
}
