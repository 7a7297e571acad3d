//! `create-key-pair` - generate the RSA pair used to sign service-account
//! tokens.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::admin::Context;
use crate::display;
use crate::error::Result;
use tessera_core::certs::write_key_pair;

use super::required_path;
use super::create_signer_cert::refuse_existing;

pub const NAME: &str = "create-key-pair";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Create an RSA key pair for signing service-account tokens")
        .after_help(format!(
            "Examples:\n  {} {NAME} --public-key=sa.pub --private-key=sa.key",
            ctx.full_name
        ))
        .arg(
            Arg::new("public-key")
                .long("public-key")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Where to write the public key"),
        )
        .arg(
            Arg::new("private-key")
                .long("private-key")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Where to write the private key"),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Replace existing files"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let public = required_path(matches, "public-key");
    let private = required_path(matches, "private-key");
    refuse_existing(&[&public, &private], matches.get_flag("overwrite"))?;
    write_key_pair(&public, &private)?;
    display::success(&format!(
        "Created key pair at {} and {}",
        public.display(),
        private.display()
    ));
    Ok(())
}
