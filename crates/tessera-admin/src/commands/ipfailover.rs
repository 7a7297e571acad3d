//! `ipfailover` - generate or create the IP-failover deployment.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::factory::Factory;
use tessera_core::manifest::{Container, ContainerPort, DeploymentConfig, EnvVar};

use super::{required_str, split_csv};

pub const NAME: &str = "ipfailover";
pub const DEFAULT_IMAGE: &str = "registry.tessera.io/tessera/ipfailover:latest";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Install an IP failover group on a set of nodes")
        .long_about(
            "Configure a virtual-IP failover group. By default the generated \
             deployment manifest is printed; pass --create to submit it to the \
             cluster instead.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} --virtual-ips=10.1.1.1-4 --interface=eth0 --create",
            ctx.full_name
        ))
        .arg(
            Arg::new("name")
                .value_name("NAME")
                .default_value(NAME)
                .help("Name for the failover group"),
        )
        .arg(
            Arg::new("virtual-ips")
                .long("virtual-ips")
                .value_name("IPS")
                .required(true)
                .help("Comma-separated virtual IP addresses or ranges to manage"),
        )
        .arg(
            Arg::new("interface")
                .long("interface")
                .value_name("NIC")
                .help("Network interface to bind the virtual IPs to"),
        )
        .arg(
            Arg::new("watch-port")
                .long("watch-port")
                .value_name("PORT")
                .value_parser(value_parser!(u16))
                .default_value("80")
                .help("Port to monitor for deciding failover"),
        )
        .arg(
            Arg::new("replicas")
                .long("replicas")
                .value_name("COUNT")
                .value_parser(value_parser!(u32))
                .default_value("2")
                .help("Number of failover pods"),
        )
        .arg(
            Arg::new("image")
                .long("image")
                .value_name("IMAGE")
                .default_value(DEFAULT_IMAGE)
                .help("Image for the failover pods"),
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
    let virtual_ips = split_csv(required_str(matches, "virtual-ips"));
    if virtual_ips.is_empty() {
        return Err(CliError::validation("--virtual-ips must name at least one address"));
    }
    let watch_port = *matches.get_one::<u16>("watch-port").unwrap_or(&80);

    let mut env = vec![
        EnvVar {
            name: "TESSERA_HA_VIRTUAL_IPS".to_string(),
            value: virtual_ips.join(","),
        },
        EnvVar {
            name: "TESSERA_HA_WATCH_PORT".to_string(),
            value: watch_port.to_string(),
        },
    ];
    if let Some(interface) = matches.get_one::<String>("interface") {
        env.push(EnvVar {
            name: "TESSERA_HA_NETWORK_INTERFACE".to_string(),
            value: interface.clone(),
        });
    }

    let mut manifest = DeploymentConfig::single_container(
        name,
        NAME,
        Container {
            name: name.to_string(),
            image: required_str(matches, "image").to_string(),
            ports: vec![ContainerPort {
                container_port: watch_port,
                host_port: Some(watch_port),
            }],
            env,
            volume_mounts: vec![],
        },
    );
    manifest.spec.replicas = *matches.get_one::<u32>("replicas").unwrap_or(&2);
    // Failover pods own the node's interfaces.
    manifest.spec.template.host_network = true;
    Ok(manifest)
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    let manifest = build_manifest(matches)?;
    if matches.get_flag("create") {
        let client = factory.api_client(matches)?;
        client.create_deployment(&manifest).await?;
        display::success(&format!("Created IP failover group {}", manifest.metadata.name));
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
    fn test_virtual_ips_are_required() {
        assert!(command(&ctx()).try_get_matches_from([NAME]).is_err());
    }

    #[test]
    fn test_manifest_uses_host_network_and_env() {
        let matches = command(&ctx())
            .try_get_matches_from([
                NAME,
                "--virtual-ips=10.1.1.1,10.1.1.2",
                "--interface=eth0",
                "--watch-port=8080",
            ])
            .unwrap();
        let manifest = build_manifest(&matches).unwrap();
        assert!(manifest.spec.template.host_network);
        assert_eq!(manifest.spec.replicas, 2);
        let env = &manifest.spec.template.containers[0].env;
        assert!(env.iter().any(|e| e.name == "TESSERA_HA_VIRTUAL_IPS"
            && e.value == "10.1.1.1,10.1.1.2"));
        assert!(env.iter().any(|e| e.name == "TESSERA_HA_WATCH_PORT" && e.value == "8080"));
    }

    #[test]
    fn test_empty_virtual_ips_rejected() {
        let matches = command(&ctx())
            .try_get_matches_from([NAME, "--virtual-ips=,"])
            .unwrap();
        assert!(build_manifest(&matches).is_err());
    }
}
