//! Node configuration and node status types.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

pub const NODE_CONFIG_FILENAME: &str = "node-config.yaml";

/// Configuration file consumed by a node at startup, written by
/// `tesseradm node-config`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    pub api_version: String,
    pub kind: String,
    pub node_name: String,
    pub hostnames: Vec<String>,
    pub master_url: String,
    pub dns_domain: String,
    pub volume_directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
}

impl NodeConfig {
    pub fn new(node_name: &str, hostnames: Vec<String>, master_url: &str) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "NodeConfig".to_string(),
            node_name: node_name.to_string(),
            hostnames,
            master_url: master_url.to_string(),
            dns_domain: "cluster.local".to_string(),
            volume_directory: "/var/lib/tessera/volumes".to_string(),
            certificate_authority: None,
            client_certificate: None,
            client_key: None,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

/// Node as reported by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeStatus {
    pub name: String,
    pub schedulable: bool,
    pub ready: bool,
    #[serde(default)]
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PodInfo {
    pub name: String,
    pub namespace: String,
    pub status: String,
}

/// Result of evacuating a node's pods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EvacuationReport {
    pub node: String,
    pub dry_run: bool,
    #[serde(default)]
    pub evacuated: Vec<PodInfo>,
}
