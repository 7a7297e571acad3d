//! `overwrite-bootstrap-policy` - replace the cluster's roles with the
//! contents of a policy file.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::factory::Factory;
use tessera_core::policy::PolicyFile;

use super::required_path;

pub const NAME: &str = "overwrite-bootstrap-policy";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Replace cluster policy with the contents of a policy file")
        .long_about(
            "Push a policy file to the cluster, replacing all existing roles. \
             This is destructive: role customizations not present in the file \
             are lost, so the command refuses to run without --force.",
        )
        .after_help(format!(
            "Examples:\n  {full} {NAME} --filename=policy.yaml --force\n\n\
             Generate a starting file with:\n  {full} create-bootstrap-policy-file",
            full = ctx.full_name
        ))
        .arg(
            Arg::new("filename")
                .long("filename")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Policy file to push"),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .action(ArgAction::SetTrue)
                .help("Really replace the cluster's policy"),
        )
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    let path = required_path(matches, "filename");
    let content = std::fs::read_to_string(&path)?;
    let policy: PolicyFile = serde_yaml::from_str(&content)
        .map_err(|e| CliError::validation(format!("invalid policy file: {e}")))?;

    if !matches.get_flag("force") {
        return Err(CliError::validation_with_help(
            "refusing to overwrite cluster policy without --force",
            "this replaces every role on the cluster with the file's contents",
        ));
    }

    let client = factory.api_client(matches)?;
    client.overwrite_policy(&policy).await?;
    display::success(&format!(
        "Replaced cluster policy with {}",
        display::pluralize(policy.roles.len(), "role", "roles")
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context {
            full_name: "tesseradm".to_string(),
        }
    }

    #[test]
    fn test_filename_is_required() {
        assert!(command(&ctx()).try_get_matches_from([NAME]).is_err());
    }

    #[tokio::test]
    async fn test_refuses_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(
            &path,
            serde_yaml::to_string(&PolicyFile::bootstrap()).unwrap(),
        )
        .unwrap();

        let matches = command(&ctx())
            .try_get_matches_from([NAME, "--filename", path.to_str().unwrap()])
            .unwrap();
        let result = run(&Factory, &matches).await;
        assert!(matches!(result, Err(CliError::Validation { .. })));
    }
}
