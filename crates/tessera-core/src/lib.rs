//! Tessera Core - shared types for the cluster administrative tooling
//!
//! This crate provides the foundations the `tesseradm` CLI is built on:
//! - `ClientConfig`: resolved connection settings for the control plane
//! - `Kubeconfig`: the on-disk client configuration file format
//! - `ApiClient`: HTTP client for the control-plane REST API
//! - Bootstrap policy, project template, and node configuration defaults
//! - Certificate generation for signers, servers, and clients

pub mod certs;
pub mod client;
pub mod config;
pub mod error;
pub mod kubeconfig;
pub mod manifest;
pub mod node;
pub mod policy;
pub mod project;

pub use certs::CertBundle;
pub use client::ApiClient;
pub use config::{ClientConfig, ConfigOverrides};
pub use error::{CoreError, Result};
pub use kubeconfig::Kubeconfig;
