//! Client-configuration factory bound to the root command's global flags.
//!
//! One instance is created when the admin tree is assembled and handed by
//! reference to every subcommand constructor. The factory never mutates
//! anything: it registers the connection flags once and resolves a client
//! configuration lazily when a handler asks for one.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::error::Result;
use tessera_core::config::{ClientConfig, ConfigOverrides};
use tessera_core::{ApiClient, Kubeconfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct Factory;

impl Factory {
    /// The global connection flags, visible to every subcommand.
    pub fn global_args() -> Vec<Arg> {
        vec![
            Arg::new("server")
                .long("server")
                .value_name("URL")
                .env("TESSERA_SERVER")
                .global(true)
                .help("The address of the control-plane API server"),
            Arg::new("token")
                .long("token")
                .value_name("TOKEN")
                .env("TESSERA_TOKEN")
                .global(true)
                .help("Bearer token for authentication to the API server"),
            Arg::new("certificate-authority")
                .long("certificate-authority")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .global(true)
                .help("Path to a certificate file for the certificate authority"),
            Arg::new("insecure-skip-tls-verify")
                .long("insecure-skip-tls-verify")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Skip verification of the server's certificate (insecure)"),
            Arg::new("namespace")
                .long("namespace")
                .short('n')
                .value_name("NAME")
                .global(true)
                .help("Namespace scope for namespaced operations"),
            Arg::new("kubeconfig")
                .long("kubeconfig")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .env("TESSERA_KUBECONFIG")
                .global(true)
                .help("Path to the client configuration file"),
            Arg::new("cli-context")
                .long("context")
                .value_name("NAME")
                .global(true)
                .help("The kubeconfig context to use"),
            Arg::new("request-timeout")
                .long("request-timeout")
                .value_name("SECONDS")
                .value_parser(value_parser!(u64))
                .global(true)
                .help("Timeout for requests to the API server"),
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable debug output"),
        ]
    }

    /// Attach the global connection flags to `cmd`.
    pub fn register(cmd: Command) -> Command {
        cmd.args(Self::global_args())
    }

    /// Collect the flag-level overrides present in `matches`.
    pub fn overrides(matches: &ArgMatches) -> ConfigOverrides {
        ConfigOverrides {
            server: matches.get_one::<String>("server").cloned(),
            token: matches.get_one::<String>("token").cloned(),
            certificate_authority: matches.get_one::<PathBuf>("certificate-authority").cloned(),
            insecure_skip_tls_verify: matches.get_flag("insecure-skip-tls-verify"),
            namespace: matches.get_one::<String>("namespace").cloned(),
            context: matches.get_one::<String>("cli-context").cloned(),
            kubeconfig: matches.get_one::<PathBuf>("kubeconfig").cloned(),
            request_timeout: matches.get_one::<u64>("request-timeout").copied(),
        }
    }

    /// Resolve the effective client configuration for an invocation.
    pub fn client_config(&self, matches: &ArgMatches) -> Result<ClientConfig> {
        Ok(ClientConfig::resolve(&Self::overrides(matches))?)
    }

    /// Build an API client for an invocation.
    pub fn api_client(&self, matches: &ArgMatches) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.client_config(matches)?)?)
    }

    /// Path of the kubeconfig file an invocation refers to.
    pub fn kubeconfig_path(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("kubeconfig")
            .cloned()
            .unwrap_or_else(ClientConfig::default_kubeconfig_path)
    }

    /// Load the kubeconfig file an invocation refers to.
    pub fn load_kubeconfig(matches: &ArgMatches) -> Result<(PathBuf, Kubeconfig)> {
        let path = Self::kubeconfig_path(matches);
        let config = Kubeconfig::load(&path)?;
        Ok((path, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Command {
        Factory::register(Command::new("test").subcommand(Command::new("noop")))
    }

    #[test]
    fn test_global_flags_propagate_to_subcommands() {
        let matches = root()
            .try_get_matches_from(["test", "noop", "--server", "https://x:8443", "-n", "web"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let overrides = Factory::overrides(sub);
        assert_eq!(overrides.server.as_deref(), Some("https://x:8443"));
        assert_eq!(overrides.namespace.as_deref(), Some("web"));
    }

    #[test]
    fn test_overrides_default_to_unset() {
        let matches = root().try_get_matches_from(["test", "noop"]).unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let overrides = Factory::overrides(sub);
        assert_eq!(overrides.server, None);
        assert!(!overrides.insecure_skip_tls_verify);
    }
}
