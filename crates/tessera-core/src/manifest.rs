//! Deployment and service manifests generated by the infrastructure
//! commands (`router`, `registry`, `ipfailover`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: DeploymentSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    pub replicas: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selector: BTreeMap<String, String>,
    pub template: PodTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplate {
    #[serde(default, skip_serializing_if = "is_false")]
    pub host_network: bool,
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    pub container_port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: ServiceSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSpec {
    pub selector: BTreeMap<String, String>,
    pub ports: Vec<ServicePort>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub port: u16,
    pub target_port: u16,
}

impl DeploymentConfig {
    /// A single-container deployment labeled and selected by component name.
    pub fn single_container(name: &str, component: &str, container: Container) -> Self {
        let labels = BTreeMap::from([(String::from("tessera.io/component"), component.to_string())]);
        Self {
            api_version: "v1".to_string(),
            kind: "DeploymentConfig".to_string(),
            metadata: Metadata {
                name: name.to_string(),
                labels: labels.clone(),
            },
            spec: DeploymentSpec {
                replicas: 1,
                selector: labels,
                template: PodTemplate {
                    host_network: false,
                    containers: vec![container],
                },
            },
        }
    }
}

impl ServiceConfig {
    /// A service selecting the given component on a single port.
    pub fn for_component(name: &str, component: &str, port: u16) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "Service".to_string(),
            metadata: Metadata {
                name: name.to_string(),
                labels: BTreeMap::new(),
            },
            spec: ServiceSpec {
                selector: BTreeMap::from([(
                    String::from("tessera.io/component"),
                    component.to_string(),
                )]),
                ports: vec![ServicePort {
                    port,
                    target_port: port,
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_container_selector_matches_labels() {
        let dc = DeploymentConfig::single_container(
            "router",
            "router",
            Container {
                name: "router".to_string(),
                image: "registry.tessera.io/tessera/router:latest".to_string(),
                ..Container::default()
            },
        );
        assert_eq!(dc.metadata.labels, dc.spec.selector);
        assert_eq!(dc.spec.template.containers.len(), 1);
    }

    #[test]
    fn test_manifest_yaml_omits_empty_sections() {
        let dc = DeploymentConfig::single_container(
            "registry",
            "registry",
            Container {
                name: "registry".to_string(),
                image: "img".to_string(),
                ..Container::default()
            },
        );
        let yaml = serde_yaml::to_string(&dc).unwrap();
        assert!(yaml.contains("kind: DeploymentConfig"));
        assert!(!yaml.contains("hostNetwork"));
        assert!(!yaml.contains("env:"));
    }

    #[test]
    fn test_service_targets_component() {
        let svc = ServiceConfig::for_component("registry", "registry", 5000);
        assert_eq!(svc.spec.ports[0].port, 5000);
        assert_eq!(
            svc.spec.selector.get("tessera.io/component").unwrap(),
            "registry"
        );
    }
}
