//! `prune` - remove older cluster resources by policy.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::factory::Factory;
use tessera_core::client::{PruneKind, PruneReport, PruneRequest};

pub const NAME: &str = "prune";

fn prune_subcommand(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("keep-younger-than")
                .long("keep-younger-than")
                .value_name("DURATION")
                .default_value("60m")
                .help("Keep resources younger than this (e.g. 90m, 24h, 7d)"),
        )
        .arg(
            Arg::new("keep-complete")
                .long("keep-complete")
                .value_name("COUNT")
                .value_parser(value_parser!(u32))
                .default_value("5")
                .help("Keep this many of the most recent completed resources"),
        )
        .arg(
            Arg::new("keep-failed")
                .long("keep-failed")
                .value_name("COUNT")
                .value_parser(value_parser!(u32))
                .default_value("1")
                .help("Keep this many of the most recent failed resources"),
        )
        .arg(
            Arg::new("confirm")
                .long("confirm")
                .action(ArgAction::SetTrue)
                .help("Actually prune; without this flag, only the candidates are listed"),
        )
}

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Remove older resources to reclaim storage")
        .after_help(format!(
            "Examples:\n  {} {NAME} builds --keep-younger-than=24h --confirm",
            ctx.full_name
        ))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(prune_subcommand("builds", "Prune old completed and failed builds"))
        .subcommand(prune_subcommand(
            "deployments",
            "Prune old completed and failed deployments",
        ))
        .subcommand(prune_subcommand("images", "Prune unreferenced images"))
}

/// Parse durations of the form `30s`, `90m`, `24h`, or `7d`.
fn parse_duration_secs(value: &str) -> Result<u64> {
    let (number, unit) = value.split_at(value.len().saturating_sub(1));
    let count: u64 = number
        .parse()
        .map_err(|_| CliError::validation(format!("invalid duration: {value}")))?;
    let multiplier = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86400,
        _ => {
            return Err(CliError::validation_with_help(
                format!("invalid duration unit in: {value}"),
                "use s, m, h, or d, e.g. --keep-younger-than=24h",
            ));
        }
    };
    count
        .checked_mul(multiplier)
        .ok_or_else(|| CliError::validation(format!("duration too large: {value}")))
}

fn build_request(sub: &ArgMatches) -> Result<PruneRequest> {
    Ok(PruneRequest {
        keep_younger_than_seconds: sub
            .get_one::<String>("keep-younger-than")
            .map(|v| parse_duration_secs(v))
            .transpose()?,
        keep_complete: sub.get_one::<u32>("keep-complete").copied(),
        keep_failed: sub.get_one::<u32>("keep-failed").copied(),
        confirm: sub.get_flag("confirm"),
    })
}

fn print_report(kind: PruneKind, report: &PruneReport) {
    if report.pruned.is_empty() {
        display::success(&format!("No {} to prune", kind.as_str()));
        return;
    }
    for item in &report.pruned {
        println!("  {}/{}", item.namespace, item.name);
    }
    if report.dry_run {
        display::warning(&format!(
            "Dry run: {} would be pruned (re-run with --confirm)",
            display::pluralize(report.pruned.len(), kind.as_str().trim_end_matches('s'), kind.as_str())
        ));
    } else {
        display::success(&format!(
            "Pruned {}",
            display::pluralize(report.pruned.len(), kind.as_str().trim_end_matches('s'), kind.as_str())
        ));
    }
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    let (kind, sub) = match matches.subcommand() {
        Some(("builds", sub)) => (PruneKind::Builds, sub),
        Some(("deployments", sub)) => (PruneKind::Deployments, sub),
        Some(("images", sub)) => (PruneKind::Images, sub),
        _ => return Err(CliError::internal("unregistered prune subcommand")),
    };
    let client = factory.api_client(matches)?;
    let request = build_request(sub)?;
    let report = client.prune(kind, &request).await?;
    print_report(kind, &report);
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
    fn test_parse_duration_units() {
        assert_eq!(parse_duration_secs("30s").unwrap(), 30);
        assert_eq!(parse_duration_secs("90m").unwrap(), 5400);
        assert_eq!(parse_duration_secs("24h").unwrap(), 86400);
        assert_eq!(parse_duration_secs("7d").unwrap(), 604800);
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration_secs("").is_err());
        assert!(parse_duration_secs("12").is_err());
        assert!(parse_duration_secs("h24").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_overflow() {
        assert!(parse_duration_secs("300000000000000000d").is_err());
        assert!(parse_duration_secs("213503982334601d").is_ok());
    }

    #[test]
    fn test_request_defaults_to_dry_run() {
        let matches = command(&ctx())
            .try_get_matches_from([NAME, "builds"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let request = build_request(sub).unwrap();
        assert!(!request.confirm);
        assert_eq!(request.keep_younger_than_seconds, Some(3600));
        assert_eq!(request.keep_complete, Some(5));
        assert_eq!(request.keep_failed, Some(1));
    }

    #[test]
    fn test_confirm_flag_is_forwarded() {
        let matches = command(&ctx())
            .try_get_matches_from([NAME, "images", "--confirm"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert!(build_request(sub).unwrap().confirm);
    }
}
