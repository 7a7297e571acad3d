//! `node-config` - write the configuration file a node boots from.

use clap::{Arg, ArgMatches, Command, value_parser};
use std::path::PathBuf;

use crate::admin::Context;
use crate::display;
use crate::error::Result;
use tessera_core::node::{NODE_CONFIG_FILENAME, NodeConfig};

use super::{path_arg, required_path, required_str, split_csv};

pub const NAME: &str = "node-config";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Write a configuration file for a node")
        .after_help(format!(
            "Examples:\n  {} {NAME} --node=node-1 --hostnames=node-1,10.0.0.5 \
             --master=https://master:8443 --node-dir=nodes/node-1",
            ctx.full_name
        ))
        .arg(
            Arg::new("node")
                .long("node")
                .value_name("NAME")
                .required(true)
                .help("Node name registered with the master"),
        )
        .arg(
            Arg::new("hostnames")
                .long("hostnames")
                .value_name("NAMES")
                .required(true)
                .help("Comma-separated hostnames and IPs the node answers to"),
        )
        .arg(
            Arg::new("master")
                .long("master")
                .value_name("URL")
                .default_value("https://localhost:8443")
                .help("Master the node connects to"),
        )
        .arg(
            Arg::new("node-dir")
                .long("node-dir")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("Directory to write the config into"),
        )
        .arg(
            Arg::new("dns-domain")
                .long("dns-domain")
                .value_name("DOMAIN")
                .default_value("cluster.local")
                .help("Cluster DNS domain"),
        )
        .arg(
            Arg::new("volume-dir")
                .long("volume-dir")
                .value_name("PATH")
                .help("Directory for pod volumes on the node"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = NodeConfig::new(
        required_str(matches, "node"),
        split_csv(required_str(matches, "hostnames")),
        required_str(matches, "master"),
    );
    config.dns_domain = required_str(matches, "dns-domain").to_string();
    if let Some(volume_dir) = matches.get_one::<String>("volume-dir") {
        config.volume_directory = volume_dir.clone();
    }
    // The node trusts the same CA the admin flags point at, when given.
    config.certificate_authority = path_arg(matches, "certificate-authority")
        .map(|p| p.display().to_string());

    let path = required_path(matches, "node-dir").join(NODE_CONFIG_FILENAME);
    config.save(&path)?;
    display::success(&format!("Wrote node config to {}", path.display()));
    Ok(())
}
