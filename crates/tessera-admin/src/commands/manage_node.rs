//! `manage-node` - schedulability, evacuation, and pod listing for nodes.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use console::style;

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::factory::Factory;
use tessera_core::node::PodInfo;

pub const NAME: &str = "manage-node";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Manage nodes: schedulability, evacuation, pod listing")
        .after_help(format!(
            "Examples:\n  {full} {NAME} node-1 --schedulable=false\n  {full} {NAME} node-1 node-2 --evacuate --dry-run",
            full = ctx.full_name
        ))
        .arg(
            Arg::new("nodes")
                .value_name("NODE")
                .required(true)
                .num_args(1..)
                .help("Nodes to operate on"),
        )
        .arg(
            Arg::new("schedulable")
                .long("schedulable")
                .value_name("BOOL")
                .value_parser(value_parser!(bool))
                .help("Mark the nodes schedulable or unschedulable"),
        )
        .arg(
            Arg::new("evacuate")
                .long("evacuate")
                .action(ArgAction::SetTrue)
                .help("Migrate all pods off the nodes"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("With --evacuate, only show the pods that would move"),
        )
        .arg(
            Arg::new("list-pods")
                .long("list-pods")
                .action(ArgAction::SetTrue)
                .help("List the pods on the nodes"),
        )
}

fn print_pods(pods: &[PodInfo]) {
    for pod in pods {
        println!("  {}/{}  {}", pod.namespace, pod.name, style(&pod.status).dim());
    }
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    let nodes: Vec<&String> = matches
        .get_many::<String>("nodes")
        .map(Iterator::collect)
        .unwrap_or_default();

    let schedulable = matches.get_one::<bool>("schedulable").copied();
    let evacuate = matches.get_flag("evacuate");
    let list_pods = matches.get_flag("list-pods");
    let selected = usize::from(schedulable.is_some()) + usize::from(evacuate) + usize::from(list_pods);
    if selected != 1 {
        return Err(CliError::validation_with_help(
            "exactly one of --schedulable, --evacuate, or --list-pods is required",
            "operations are mutually exclusive so their effect on each node is unambiguous",
        ));
    }
    if matches.get_flag("dry-run") && !evacuate {
        return Err(CliError::validation("--dry-run only applies to --evacuate"));
    }

    let client = factory.api_client(matches)?;
    for node in nodes {
        if let Some(schedulable) = schedulable {
            let status = client.set_node_schedulable(node, schedulable).await?;
            display::success(&format!(
                "Node {} is now {}",
                status.name,
                if status.schedulable { "schedulable" } else { "unschedulable" }
            ));
        } else if evacuate {
            let report = client.evacuate_node(node, matches.get_flag("dry-run")).await?;
            if report.dry_run {
                println!(
                    "Would evacuate {} from {}:",
                    display::pluralize(report.evacuated.len(), "pod", "pods"),
                    report.node
                );
            } else {
                println!(
                    "Evacuated {} from {}:",
                    display::pluralize(report.evacuated.len(), "pod", "pods"),
                    report.node
                );
            }
            print_pods(&report.evacuated);
        } else {
            let pods = client.list_node_pods(node).await?;
            println!("Pods on {} ({}):", node, pods.len());
            print_pods(&pods);
        }
    }
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
    fn test_requires_at_least_one_node() {
        assert!(
            command(&ctx())
                .try_get_matches_from([NAME, "--list-pods"])
                .is_err()
        );
    }

    #[test]
    fn test_schedulable_parses_booleans() {
        let matches = command(&ctx())
            .try_get_matches_from([NAME, "node-1", "--schedulable=false"])
            .unwrap();
        assert_eq!(matches.get_one::<bool>("schedulable"), Some(&false));
    }

    #[test]
    fn test_accepts_multiple_nodes() {
        let matches = command(&ctx())
            .try_get_matches_from([NAME, "node-1", "node-2", "--evacuate"])
            .unwrap();
        let nodes: Vec<&String> = matches.get_many("nodes").unwrap().collect();
        assert_eq!(nodes, ["node-1", "node-2"]);
    }
}
