//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;
use tessera_core::CoreError;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Invalid arguments or a refused operation
    #[error("Validation failed: {message}")]
    #[diagnostic(code(tesseradm::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Connection settings could not be resolved
    #[error("Configuration error: {message}")]
    #[diagnostic(code(tesseradm::config))]
    Config { message: String },

    /// The control plane rejected a request or is unreachable
    #[error("API request failed: {message}")]
    #[diagnostic(code(tesseradm::api))]
    Api { message: String },

    /// Key or certificate generation failed
    #[error("Certificate error: {message}")]
    #[diagnostic(code(tesseradm::certificate))]
    Certificate { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(tesseradm::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(tesseradm::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Api { .. } => exit_codes::API_ERROR,
            CliError::Certificate { .. } => exit_codes::CERT_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }

    /// Create a validation error with help text
    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api { .. } | CoreError::Http(_) => CliError::Api {
                message: err.to_string(),
            },
            CoreError::Certificate(_) => CliError::Certificate {
                message: err.to_string(),
            },
            CoreError::Io(inner) => CliError::Io {
                message: inner.to_string(),
            },
            CoreError::NoServer
            | CoreError::KubeconfigNotFound { .. }
            | CoreError::UnknownContext { .. }
            | CoreError::InvalidUrl(_) => CliError::Config {
                message: err.to_string(),
            },
            other => CliError::Validation {
                message: other.to_string(),
                help: None,
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_map_by_category() {
        assert_eq!(
            CliError::validation("bad").exit_code(),
            exit_codes::VALIDATION_ERROR
        );
        assert_eq!(
            CliError::from(CoreError::NoServer).exit_code(),
            exit_codes::CONFIG_ERROR
        );
        assert_eq!(
            CliError::from(CoreError::Api {
                status: 403,
                message: "forbidden".to_string()
            })
            .exit_code(),
            exit_codes::API_ERROR
        );
    }
}
