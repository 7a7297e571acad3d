//! `options` - list the flags every subcommand inherits.

use clap::Command;
use std::io::Write;

use crate::admin::Context;
use crate::error::Result;
use crate::factory::Factory;
use crate::output::Output;

pub const NAME: &str = "options";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Show the options shared by all commands")
        .after_help(format!("Run '{} options' to list them.", ctx.full_name))
        .disable_help_flag(true)
}

pub fn run(ctx: &Context, out: &mut Output) -> Result<()> {
    let mut shared = Factory::register(
        Command::new(ctx.full_name.clone())
            .about("The following options can be passed to any command:")
            .disable_help_flag(true)
            .disable_version_flag(true),
    );
    let help = shared.render_long_help();
    write!(out, "{help}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::TestBuffer;

    #[test]
    fn test_lists_shared_flags() {
        let ctx = Context {
            full_name: "tesseradm".to_string(),
        };
        let buffer = TestBuffer::default();
        let mut out = Output::new(Box::new(buffer.clone()));
        run(&ctx, &mut out).unwrap();
        let rendered = buffer.contents();
        assert!(rendered.contains("--server"));
        assert!(rendered.contains("--namespace"));
        assert!(rendered.contains("--kubeconfig"));
    }
}
