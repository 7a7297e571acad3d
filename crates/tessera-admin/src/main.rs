mod admin;
mod commands;
mod display;
mod error;
mod exit_codes;
mod factory;
mod output;

use admin::AdminCommand;
use output::Output;

fn main() {
    miette::set_panic_hook();

    let argv: Vec<String> = std::env::args().collect();
    if argv.iter().any(|arg| arg == "--debug") {
        // no threads yet; the runtime starts below
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            std::process::exit(exit_codes::ERROR);
        }
    };

    let mut admin = AdminCommand::new("tesseradm", "tesseradm", Output::stdout());
    match runtime.block_on(admin.run(&argv)) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    }
}
