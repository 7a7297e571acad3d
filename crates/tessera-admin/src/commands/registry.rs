//! `registry` - generate or create the integrated image registry.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::factory::Factory;
use tessera_core::manifest::{
    Container, ContainerPort, DeploymentConfig, ServiceConfig, VolumeMount,
};

use super::required_str;

pub const NAME: &str = "registry";
pub const DEFAULT_IMAGE: &str = "registry.tessera.io/tessera/registry:latest";
pub const REGISTRY_PORT: u16 = 5000;

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Install the integrated image registry")
        .long_about(
            "Generate the deployment and service for the integrated image \
             registry. By default both manifests are printed; pass --create \
             to submit the deployment.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} --volume=/var/lib/registry --create",
            ctx.full_name
        ))
        .arg(
            Arg::new("name")
                .value_name("NAME")
                .default_value(NAME)
                .help("Name for the registry deployment"),
        )
        .arg(
            Arg::new("volume")
                .long("volume")
                .value_name("PATH")
                .default_value("/registry")
                .help("Mount path for registry storage"),
        )
        .arg(
            Arg::new("replicas")
                .long("replicas")
                .value_name("COUNT")
                .value_parser(value_parser!(u32))
                .default_value("1")
                .help("Number of registry pods"),
        )
        .arg(
            Arg::new("image")
                .long("image")
                .value_name("IMAGE")
                .default_value(DEFAULT_IMAGE)
                .help("Image for the registry pods"),
        )
        .arg(
            Arg::new("create")
                .long("create")
                .action(ArgAction::SetTrue)
                .help("Create the deployment on the cluster instead of printing it"),
        )
}

fn build_manifests(matches: &ArgMatches) -> (DeploymentConfig, ServiceConfig) {
    let name = required_str(matches, "name");
    let mut manifest = DeploymentConfig::single_container(
        name,
        NAME,
        Container {
            name: name.to_string(),
            image: required_str(matches, "image").to_string(),
            ports: vec![ContainerPort {
                container_port: REGISTRY_PORT,
                host_port: None,
            }],
            env: vec![],
            volume_mounts: vec![VolumeMount {
                name: "storage".to_string(),
                mount_path: required_str(matches, "volume").to_string(),
            }],
        },
    );
    manifest.spec.replicas = *matches.get_one::<u32>("replicas").unwrap_or(&1);
    let service = ServiceConfig::for_component(name, NAME, REGISTRY_PORT);
    (manifest, service)
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    let (manifest, service) = build_manifests(matches);
    if matches.get_flag("create") {
        let client = factory.api_client(matches)?;
        client.create_deployment(&manifest).await?;
        display::success(&format!("Created registry {}", manifest.metadata.name));
    } else {
        print!(
            "{}---\n{}",
            serde_yaml::to_string(&manifest).map_err(|e| CliError::internal(e.to_string()))?,
            serde_yaml::to_string(&service).map_err(|e| CliError::internal(e.to_string()))?
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
    fn test_registry_mounts_storage_volume() {
        let matches = command(&ctx())
            .try_get_matches_from([NAME, "--volume=/var/lib/registry"])
            .unwrap();
        let (manifest, service) = build_manifests(&matches);
        assert_eq!(
            manifest.spec.template.containers[0].volume_mounts[0].mount_path,
            "/var/lib/registry"
        );
        assert_eq!(service.spec.ports[0].port, REGISTRY_PORT);
    }
}
