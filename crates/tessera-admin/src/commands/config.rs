//! `config` - inspect and switch kubeconfig contexts.

use clap::{Arg, ArgMatches, Command};

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::factory::Factory;

use super::required_str;

pub const NAME: &str = "config";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Inspect and switch client configuration contexts")
        .after_help(format!(
            "Examples:\n  {} {NAME} view\n  {} {NAME} use-context default/master/admin",
            ctx.full_name, ctx.full_name
        ))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("view").about("Show the current kubeconfig, minified"))
        .subcommand(Command::new("current-context").about("Show the current context name"))
        .subcommand(
            Command::new("use-context")
                .about("Switch the current context")
                .arg(Arg::new("name").value_name("NAME").required(true)),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("view", _)) => {
            let (_, config) = Factory::load_kubeconfig(matches)?;
            let yaml = serde_yaml::to_string(&config.minify())
                .map_err(|e| CliError::internal(e.to_string()))?;
            print!("{yaml}");
            Ok(())
        }
        Some(("current-context", _)) => {
            let (_, config) = Factory::load_kubeconfig(matches)?;
            if config.current_context.is_empty() {
                return Err(CliError::validation("no current context is set"));
            }
            println!("{}", config.current_context);
            Ok(())
        }
        Some(("use-context", sub)) => {
            let (path, mut config) = Factory::load_kubeconfig(matches)?;
            let name = required_str(sub, "name");
            config.use_context(name)?;
            config.save(&path)?;
            display::success(&format!("Switched to context {name}"));
            Ok(())
        }
        _ => Err(CliError::internal("unregistered config subcommand")),
    }
}
