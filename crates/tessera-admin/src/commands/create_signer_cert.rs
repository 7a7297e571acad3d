//! `create-signer-cert` - generate the self-signed CA.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use tessera_core::certs::{DEFAULT_SIGNER_EXPIRE_DAYS, make_signer_cert};

use super::required_path;

pub const NAME: &str = "create-signer-cert";
pub const DEFAULT_SIGNER_NAME: &str = "tessera-signer";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Create a self-signed CA certificate and key")
        .after_help(format!(
            "Examples:\n  {} {NAME} --cert=certs/ca.crt --key=certs/ca.key",
            ctx.full_name
        ))
        .arg(
            Arg::new("cert")
                .long("cert")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("ca.crt")
                .help("Where to write the CA certificate"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("ca.key")
                .help("Where to write the CA key"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("CN")
                .default_value(DEFAULT_SIGNER_NAME)
                .help("Common name of the signer"),
        )
        .arg(
            Arg::new("expire-days")
                .long("expire-days")
                .value_name("DAYS")
                .value_parser(value_parser!(u32))
                .default_value("1825")
                .help("Days until the CA expires"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace existing files"),
        )
}

/// Shared refusal for cert commands that would clobber existing material.
pub(super) fn refuse_existing(paths: &[&PathBuf], overwrite: bool) -> Result<()> {
    if overwrite {
        return Ok(());
    }
    for path in paths {
        if path.exists() {
            return Err(CliError::validation_with_help(
                format!("{} already exists", path.display()),
                "pass --overwrite to replace existing certificate material",
            ));
        }
    }
    Ok(())
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let cert = required_path(matches, "cert");
    let key = required_path(matches, "key");
    refuse_existing(&[&cert, &key], matches.get_flag("overwrite"))?;

    let name = matches
        .get_one::<String>("name")
        .map(String::as_str)
        .unwrap_or(DEFAULT_SIGNER_NAME);
    let days = *matches
        .get_one::<u32>("expire-days")
        .unwrap_or(&DEFAULT_SIGNER_EXPIRE_DAYS);
    let bundle = make_signer_cert(name, days)?;
    bundle.write(&cert, &key)?;
    display::success(&format!(
        "Created signer {} at {} and {}",
        name,
        cert.display(),
        key.display()
    ));
    Ok(())
}
