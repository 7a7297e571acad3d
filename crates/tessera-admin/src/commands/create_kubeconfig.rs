//! `create-kubeconfig` - assemble a client configuration file from
//! certificates generated elsewhere.
//!
//! The CA path comes from the inherited global `--certificate-authority`
//! flag and the context namespace from the global `--namespace`.

use clap::{Arg, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use tessera_core::Kubeconfig;
use tessera_core::config::DEFAULT_NAMESPACE;
use tessera_core::kubeconfig::KubeconfigBuilder;

use super::{path_arg, required_path, required_str};

pub const NAME: &str = "create-kubeconfig";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Create a kubeconfig file for a client certificate")
        .after_help(format!(
            "Examples:\n  {} {NAME} --client-certificate=admin.crt --client-key=admin.key \
             --certificate-authority=ca.crt --master=https://master:8443",
            ctx.full_name
        ))
        .arg(
            Arg::new("client-certificate")
                .long("client-certificate")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Client certificate file"),
        )
        .arg(
            Arg::new("client-key")
                .long("client-key")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Client key file"),
        )
        .arg(
            Arg::new("master")
                .long("master")
                .value_name("URL")
                .default_value("https://localhost:8443")
                .help("API server the kubeconfig points at"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .value_name("NAME")
                .default_value("admin")
                .help("User nickname for the credentials"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("admin.kubeconfig")
                .help("Where to write the generated file"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let cert = required_path(matches, "client-certificate");
    let key = required_path(matches, "client-key");
    for path in [&cert, &key] {
        if !path.exists() {
            return Err(CliError::validation_with_help(
                format!("file not found: {}", path.display()),
                "generate client certificates first with create-client",
            ));
        }
    }

    let namespace = matches
        .get_one::<String>("namespace")
        .cloned()
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    let config = Kubeconfig::build(&KubeconfigBuilder {
        server: required_str(matches, "master").to_string(),
        user: required_str(matches, "user").to_string(),
        namespace,
        client_certificate: Some(cert.display().to_string()),
        client_key: Some(key.display().to_string()),
        certificate_authority: path_arg(matches, "certificate-authority")
            .map(|p| p.display().to_string()),
        token: None,
    })?;

    let output = required_path(matches, "output");
    config.save(&output)?;
    display::success(&format!("Wrote kubeconfig to {}", output.display()));
    Ok(())
}
