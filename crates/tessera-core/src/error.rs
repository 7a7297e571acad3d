//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Certificate error: {0}")]
    Certificate(#[from] openssl::error::ErrorStack),

    #[error("Kubeconfig not found: {path}")]
    KubeconfigNotFound { path: String },

    #[error("Unknown context: {name}")]
    UnknownContext { name: String },

    #[error("No API server configured: pass --server or add a cluster to the kubeconfig")]
    NoServer,

    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
