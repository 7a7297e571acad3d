//! The on-disk client configuration file ("kubeconfig") format.
//!
//! A kubeconfig names clusters, users, and the contexts that pair them.
//! `tesseradm config` reads and mutates this file, `create-kubeconfig` and
//! `create-client` generate fresh ones, and [`crate::config`] consults it
//! when resolving connection settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CoreError, Result};

pub const KUBECONFIG_API_VERSION: &str = "v1";
pub const KUBECONFIG_KIND: &str = "Config";

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Kubeconfig {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub clusters: Vec<NamedCluster>,
    #[serde(default)]
    pub contexts: Vec<NamedContext>,
    #[serde(default)]
    pub users: Vec<NamedUser>,
    #[serde(rename = "current-context", default, skip_serializing_if = "String::is_empty")]
    pub current_context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamedCluster {
    pub name: String,
    pub cluster: Cluster,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cluster {
    pub server: String,
    #[serde(
        rename = "certificate-authority",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub certificate_authority: Option<String>,
    #[serde(
        rename = "insecure-skip-tls-verify",
        default,
        skip_serializing_if = "is_false"
    )]
    pub insecure_skip_tls_verify: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamedContext {
    pub name: String,
    pub context: Context,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Context {
    pub cluster: String,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamedUser {
    pub name: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(
        rename = "client-certificate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_certificate: Option<String>,
    #[serde(rename = "client-key", default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
}

/// Inputs for assembling a single-context kubeconfig.
#[derive(Debug, Clone)]
pub struct KubeconfigBuilder {
    pub server: String,
    pub user: String,
    pub namespace: String,
    pub client_certificate: Option<String>,
    pub client_key: Option<String>,
    pub certificate_authority: Option<String>,
    pub token: Option<String>,
}

impl Kubeconfig {
    /// Assemble a kubeconfig with one cluster, one user, and one context,
    /// and make that context current.
    pub fn build(opts: &KubeconfigBuilder) -> Result<Self> {
        let url = url::Url::parse(&opts.server)?;
        let cluster_name = url
            .host_str()
            .map(|h| h.replace('.', "-"))
            .ok_or(CoreError::NoServer)?;
        let context_name = format!("{}/{}/{}", opts.namespace, cluster_name, opts.user);

        Ok(Kubeconfig {
            api_version: KUBECONFIG_API_VERSION.to_string(),
            kind: KUBECONFIG_KIND.to_string(),
            clusters: vec![NamedCluster {
                name: cluster_name.clone(),
                cluster: Cluster {
                    server: opts.server.clone(),
                    certificate_authority: opts.certificate_authority.clone(),
                    insecure_skip_tls_verify: opts.certificate_authority.is_none(),
                },
            }],
            contexts: vec![NamedContext {
                name: context_name.clone(),
                context: Context {
                    cluster: cluster_name,
                    user: opts.user.clone(),
                    namespace: Some(opts.namespace.clone()),
                },
            }],
            users: vec![NamedUser {
                name: opts.user.clone(),
                user: User {
                    token: opts.token.clone(),
                    client_certificate: opts.client_certificate.clone(),
                    client_key: opts.client_key.clone(),
                },
            }],
            current_context: context_name,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::KubeconfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn context(&self, name: &str) -> Option<&NamedContext> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn cluster(&self, name: &str) -> Option<&NamedCluster> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn user(&self, name: &str) -> Option<&NamedUser> {
        self.users.iter().find(|u| u.name == name)
    }

    /// Switch the current context, failing on unknown names.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.context(name).is_none() {
            return Err(CoreError::UnknownContext {
                name: name.to_string(),
            });
        }
        self.current_context = name.to_string();
        Ok(())
    }

    /// Reduce the config to the current context and the cluster and user it
    /// references. Configs without a current context minify to themselves.
    pub fn minify(&self) -> Kubeconfig {
        let Some(ctx) = self.context(&self.current_context) else {
            return self.clone();
        };
        Kubeconfig {
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            clusters: self
                .cluster(&ctx.context.cluster)
                .into_iter()
                .cloned()
                .collect(),
            contexts: vec![ctx.clone()],
            users: self.user(&ctx.context.user).into_iter().cloned().collect(),
            current_context: self.current_context.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Kubeconfig {
        let mut config = Kubeconfig::build(&KubeconfigBuilder {
            server: "https://master.tessera.local:8443".to_string(),
            user: "admin".to_string(),
            namespace: "default".to_string(),
            client_certificate: Some("admin.crt".to_string()),
            client_key: Some("admin.key".to_string()),
            certificate_authority: Some("ca.crt".to_string()),
            token: None,
        })
        .unwrap();
        config.clusters.push(NamedCluster {
            name: "other".to_string(),
            cluster: Cluster {
                server: "https://other:8443".to_string(),
                ..Cluster::default()
            },
        });
        config
    }

    #[test]
    fn test_build_names_context_after_namespace_cluster_user() {
        let config = sample();
        assert_eq!(config.current_context, "default/master-tessera-local/admin");
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].context.cluster, "master-tessera-local");
    }

    #[test]
    fn test_build_without_ca_skips_verification() {
        let config = Kubeconfig::build(&KubeconfigBuilder {
            server: "https://localhost:8443".to_string(),
            user: "admin".to_string(),
            namespace: "default".to_string(),
            client_certificate: None,
            client_key: None,
            certificate_authority: None,
            token: Some("sekret".to_string()),
        })
        .unwrap();
        assert!(config.clusters[0].cluster.insecure_skip_tls_verify);
        assert_eq!(config.users[0].user.token.as_deref(), Some("sekret"));
    }

    #[test]
    fn test_minify_drops_unreferenced_clusters() {
        let config = sample();
        assert_eq!(config.clusters.len(), 2);
        let minified = config.minify();
        assert_eq!(minified.clusters.len(), 1);
        assert_eq!(minified.clusters[0].name, "master-tessera-local");
    }

    #[test]
    fn test_use_context_rejects_unknown_names() {
        let mut config = sample();
        assert!(matches!(
            config.use_context("nope"),
            Err(CoreError::UnknownContext { .. })
        ));
        config
            .use_context("default/master-tessera-local/admin")
            .unwrap();
    }

    #[test]
    fn test_roundtrip_through_yaml() {
        let config = sample();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("apiVersion: v1"));
        assert!(yaml.contains("certificate-authority: ca.crt"));
        let parsed: Kubeconfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let config = sample();
        config.save(&path).unwrap();
        assert_eq!(Kubeconfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Kubeconfig::load(Path::new("/does/not/exist")),
            Err(CoreError::KubeconfigNotFound { .. })
        ));
    }
}
