//! `create-bootstrap-project-template` - print the default project template.

use clap::{ArgMatches, Command};

use crate::admin::Context;
use crate::error::{CliError, Result};
use tessera_core::project::bootstrap_project_template;

pub const NAME: &str = "create-bootstrap-project-template";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Print the default template used for new projects")
        .long_about(
            "Print the template the server instantiates for each new project. \
             Customize it and install it on the master to control what every \
             project starts with.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} > project-template.yaml",
            ctx.full_name
        ))
}

pub fn run(_matches: &ArgMatches) -> Result<()> {
    let template = bootstrap_project_template();
    let yaml = serde_yaml::to_string(&template).map_err(|e| CliError::internal(e.to_string()))?;
    print!("{yaml}");
    Ok(())
}
