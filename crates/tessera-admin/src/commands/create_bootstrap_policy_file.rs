//! `create-bootstrap-policy-file` - write the default roles to disk.

use clap::{Arg, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use tessera_core::policy::PolicyFile;

use super::required_path;

pub const NAME: &str = "create-bootstrap-policy-file";
pub const DEFAULT_FILENAME: &str = "bootstrap-policy.yaml";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Write the default bootstrap policy to a file")
        .long_about(
            "Write the roles a new cluster starts with to a file, as a \
             starting point for customization before first start or for \
             use with overwrite-bootstrap-policy.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} --filename=policy.yaml",
            ctx.full_name
        ))
        .arg(
            Arg::new("filename")
                .long("filename")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_FILENAME)
                .help("Where to write the policy file"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let path = required_path(matches, "filename");
    let policy = PolicyFile::bootstrap();
    let yaml = serde_yaml::to_string(&policy).map_err(|e| CliError::internal(e.to_string()))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, yaml)?;
    display::success(&format!(
        "Wrote {} with {}",
        path.display(),
        display::pluralize(policy.roles.len(), "role", "roles")
    ));
    Ok(())
}
