//! `version` - print the version of this binary.

use clap::Command;
use std::io::Write;

use crate::admin::Context;
use crate::error::Result;
use crate::output::Output;

pub const NAME: &str = "version";

pub fn command(_ctx: &Context) -> Command {
    Command::new(NAME).about("Display version")
}

pub fn run(ctx: &Context, out: &mut Output) -> Result<()> {
    writeln!(out, "{} v{}", ctx.full_name, env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
