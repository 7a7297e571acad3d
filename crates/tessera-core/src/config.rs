//! Client configuration resolution.
//!
//! Connection settings come from three places, highest priority first:
//! explicit flags (and their environment fallbacks, handled by the CLI
//! layer), the kubeconfig file, and built-in defaults. The resolved
//! [`ClientConfig`] is what [`crate::client::ApiClient`] is built from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CoreError, Result};
use crate::kubeconfig::Kubeconfig;

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Flag-level overrides collected by the CLI before resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub server: Option<String>,
    pub token: Option<String>,
    pub certificate_authority: Option<PathBuf>,
    pub insecure_skip_tls_verify: bool,
    pub namespace: Option<String>,
    pub context: Option<String>,
    pub kubeconfig: Option<PathBuf>,
    pub request_timeout: Option<u64>,
}

/// Resolved connection settings for the control plane.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server: String,
    pub token: Option<String>,
    pub certificate_authority: Option<PathBuf>,
    pub insecure_skip_tls_verify: bool,
    pub namespace: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Default location of the kubeconfig file when neither the flag nor the
    /// environment names one.
    pub fn default_kubeconfig_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tessera")
            .join("config")
    }

    /// Resolve connection settings from overrides and the kubeconfig file.
    ///
    /// The kubeconfig is consulted only for settings the overrides leave
    /// unset; a missing file is not an error unless it leaves no server.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let path = overrides
            .kubeconfig
            .clone()
            .unwrap_or_else(Self::default_kubeconfig_path);

        let mut resolved = Self {
            server: overrides.server.clone().unwrap_or_default(),
            token: overrides.token.clone(),
            certificate_authority: overrides.certificate_authority.clone(),
            insecure_skip_tls_verify: overrides.insecure_skip_tls_verify,
            namespace: overrides.namespace.clone().unwrap_or_default(),
            timeout: Duration::from_secs(
                overrides
                    .request_timeout
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        };

        if path.exists() {
            resolved.fill_from_kubeconfig(&path, overrides.context.as_deref())?;
        }

        if resolved.server.is_empty() {
            return Err(CoreError::NoServer);
        }
        url::Url::parse(&resolved.server)?;
        if resolved.namespace.is_empty() {
            resolved.namespace = DEFAULT_NAMESPACE.to_string();
        }
        Ok(resolved)
    }

    fn fill_from_kubeconfig(&mut self, path: &Path, context: Option<&str>) -> Result<()> {
        let config = Kubeconfig::load(path)?;
        let context_name = context.unwrap_or(&config.current_context);
        if context_name.is_empty() {
            return Ok(());
        }
        let Some(ctx) = config.context(context_name) else {
            // An explicitly requested context must exist.
            if context.is_some() {
                return Err(CoreError::UnknownContext {
                    name: context_name.to_string(),
                });
            }
            return Ok(());
        };

        if let Some(cluster) = config.cluster(&ctx.context.cluster) {
            if self.server.is_empty() {
                self.server = cluster.cluster.server.clone();
            }
            if self.certificate_authority.is_none() {
                self.certificate_authority = cluster
                    .cluster
                    .certificate_authority
                    .as_ref()
                    .map(PathBuf::from);
            }
            if cluster.cluster.insecure_skip_tls_verify {
                self.insecure_skip_tls_verify = true;
            }
        }
        if let Some(user) = config.user(&ctx.context.user) {
            if self.token.is_none() {
                self.token = user.user.token.clone();
            }
        }
        if self.namespace.is_empty() {
            if let Some(ns) = &ctx.context.namespace {
                self.namespace = ns.clone();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubeconfig::KubeconfigBuilder;

    fn write_kubeconfig(dir: &Path) -> PathBuf {
        let config = Kubeconfig::build(&KubeconfigBuilder {
            server: "https://master.tessera.local:8443".to_string(),
            user: "admin".to_string(),
            namespace: "infra".to_string(),
            client_certificate: None,
            client_key: None,
            certificate_authority: None,
            token: Some("file-token".to_string()),
        })
        .unwrap();
        let path = dir.join("config");
        config.save(&path).unwrap();
        path
    }

    #[test]
    fn test_flags_take_precedence_over_kubeconfig() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_kubeconfig(dir.path());
        let resolved = ClientConfig::resolve(&ConfigOverrides {
            server: Some("https://override:8443".to_string()),
            token: Some("flag-token".to_string()),
            namespace: Some("web".to_string()),
            kubeconfig: Some(path),
            ..ConfigOverrides::default()
        })
        .unwrap();
        assert_eq!(resolved.server, "https://override:8443");
        assert_eq!(resolved.token.as_deref(), Some("flag-token"));
        assert_eq!(resolved.namespace, "web");
    }

    #[test]
    fn test_kubeconfig_fills_unset_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_kubeconfig(dir.path());
        let resolved = ClientConfig::resolve(&ConfigOverrides {
            kubeconfig: Some(path),
            ..ConfigOverrides::default()
        })
        .unwrap();
        assert_eq!(resolved.server, "https://master.tessera.local:8443");
        assert_eq!(resolved.token.as_deref(), Some("file-token"));
        assert_eq!(resolved.namespace, "infra");
        assert_eq!(
            resolved.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_missing_server_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::resolve(&ConfigOverrides {
            kubeconfig: Some(dir.path().join("absent")),
            ..ConfigOverrides::default()
        });
        assert!(matches!(result, Err(CoreError::NoServer)));
    }

    #[test]
    fn test_unknown_explicit_context_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_kubeconfig(dir.path());
        let result = ClientConfig::resolve(&ConfigOverrides {
            context: Some("missing".to_string()),
            kubeconfig: Some(path),
            ..ConfigOverrides::default()
        });
        assert!(matches!(result, Err(CoreError::UnknownContext { .. })));
    }

    #[test]
    fn test_invalid_server_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::resolve(&ConfigOverrides {
            server: Some("not a url".to_string()),
            kubeconfig: Some(dir.path().join("absent")),
            ..ConfigOverrides::default()
        });
        assert!(matches!(result, Err(CoreError::InvalidUrl(_))));
    }
}
