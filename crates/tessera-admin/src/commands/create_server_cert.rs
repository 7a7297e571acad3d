//! `create-server-cert` - issue a serving certificate from an existing CA.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use tessera_core::CertBundle;
use tessera_core::certs::{DEFAULT_CERT_EXPIRE_DAYS, make_server_cert};

use super::{required_path, split_csv};
use super::create_signer_cert::refuse_existing;

pub const NAME: &str = "create-server-cert";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Create a server certificate signed by a CA")
        .long_about(
            "Issue a certificate valid for the given hostnames and IPs, \
             signed by an existing CA created with create-signer-cert.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} --signer-cert=ca.crt --signer-key=ca.key \
             --hostnames=master.example.com,10.0.0.1 --cert=server.crt --key=server.key",
            ctx.full_name
        ))
        .arg(
            Arg::new("signer-cert")
                .long("signer-cert")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("ca.crt")
                .help("CA certificate to sign with"),
        )
        .arg(
            Arg::new("signer-key")
                .long("signer-key")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("ca.key")
                .help("CA key to sign with"),
        )
        .arg(
            Arg::new("hostnames")
                .long("hostnames")
                .value_name("NAMES")
                .required(true)
                .help("Comma-separated hostnames and IPs the certificate is valid for"),
        )
        .arg(
            Arg::new("cert")
                .long("cert")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Where to write the certificate"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Where to write the key"),
        )
        .arg(
            Arg::new("expire-days")
                .long("expire-days")
                .value_name("DAYS")
                .value_parser(value_parser!(u32))
                .default_value("730")
                .help("Days until the certificate expires"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace existing files"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let cert = required_path(matches, "cert");
    let key = required_path(matches, "key");
    refuse_existing(&[&cert, &key], matches.get_flag("overwrite"))?;

    let hostnames = split_csv(
        matches
            .get_one::<String>("hostnames")
            .map(String::as_str)
            .unwrap_or_default(),
    );
    if hostnames.is_empty() {
        return Err(CliError::validation("--hostnames must not be empty"));
    }

    let signer = CertBundle::load(
        &required_path(matches, "signer-cert"),
        &required_path(matches, "signer-key"),
    )?;
    let days = *matches
        .get_one::<u32>("expire-days")
        .unwrap_or(&DEFAULT_CERT_EXPIRE_DAYS);
    let bundle = make_server_cert(&signer, &hostnames, days)?;
    bundle.write(&cert, &key)?;
    display::success(&format!(
        "Created server certificate for {} at {}",
        hostnames.join(", "),
        cert.display()
    ));
    Ok(())
}
