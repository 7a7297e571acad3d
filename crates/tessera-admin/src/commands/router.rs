//! `router` - generate or create the cluster router deployment.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::factory::Factory;
use tessera_core::manifest::{Container, ContainerPort, DeploymentConfig};

use super::{required_str, split_csv};

pub const NAME: &str = "router";
pub const DEFAULT_IMAGE: &str = "registry.tessera.io/tessera/router:latest";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Install a router for external traffic")
        .long_about(
            "Generate the deployment for the cluster edge router. By default \
             the manifest is printed for review; pass --create to submit it.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} --replicas=2 --create",
            ctx.full_name
        ))
        .arg(
            Arg::new("name")
                .value_name("NAME")
                .default_value(NAME)
                .help("Name for the router deployment"),
        )
        .arg(
            Arg::new("ports")
                .long("ports")
                .value_name("PORTS")
                .default_value("80,443")
                .help("Comma-separated ports the router exposes on each node"),
        )
        .arg(
            Arg::new("replicas")
                .long("replicas")
                .value_name("COUNT")
                .value_parser(value_parser!(u32))
                .default_value("1")
                .help("Number of router pods"),
        )
        .arg(
            Arg::new("image")
                .long("image")
                .value_name("IMAGE")
                .default_value(DEFAULT_IMAGE)
                .help("Image for the router pods"),
        )
        .arg(
            Arg::new("create")
                .long("create")
                .action(ArgAction::SetTrue)
                .help("Create the deployment on the cluster instead of printing it"),
        )
}

fn build_manifest(matches: &ArgMatches) -> Result<DeploymentConfig> {
    let name = required_str(matches, "name");
    let mut ports = Vec::new();
    for raw in split_csv(required_str(matches, "ports")) {
        let port: u16 = raw
            .parse()
            .map_err(|_| CliError::validation(format!("invalid port: {raw}")))?;
        ports.push(ContainerPort {
            container_port: port,
            host_port: Some(port),
        });
    }
    if ports.is_empty() {
        return Err(CliError::validation("--ports must name at least one port"));
    }

    let mut manifest = DeploymentConfig::single_container(
        name,
        NAME,
        Container {
            name: name.to_string(),
            image: required_str(matches, "image").to_string(),
            ports,
            env: vec![],
            volume_mounts: vec![],
        },
    );
    manifest.spec.replicas = *matches.get_one::<u32>("replicas").unwrap_or(&1);
    manifest.spec.template.host_network = true;
    Ok(manifest)
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    let manifest = build_manifest(matches)?;
    if matches.get_flag("create") {
        let client = factory.api_client(matches)?;
        client.create_deployment(&manifest).await?;
        display::success(&format!("Created router {}", manifest.metadata.name));
    } else {
        print!(
            "{}",
            serde_yaml::to_string(&manifest).map_err(|e| CliError::internal(e.to_string()))?
        );
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
    fn test_default_ports_are_http_and_https() {
        let matches = command(&ctx()).try_get_matches_from([NAME]).unwrap();
        let manifest = build_manifest(&matches).unwrap();
        let ports: Vec<u16> = manifest.spec.template.containers[0]
            .ports
            .iter()
            .map(|p| p.container_port)
            .collect();
        assert_eq!(ports, [80, 443]);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let matches = command(&ctx())
            .try_get_matches_from([NAME, "--ports=eighty"])
            .unwrap();
        assert!(build_manifest(&matches).is_err());
    }
}
