//! CLI commands
//!
//! One module per registered subcommand. Each exposes a `command`
//! constructor consumed by the registration table in [`crate::admin`] and a
//! `run` handler invoked by dispatch.

use clap::ArgMatches;
use std::path::{Path, PathBuf};

pub mod build_chain;
pub mod config;
pub mod create_bootstrap_policy_file;
pub mod create_bootstrap_project_template;
pub mod create_client;
pub mod create_key_pair;
pub mod create_kubeconfig;
pub mod create_master_certs;
pub mod create_server_cert;
pub mod create_signer_cert;
pub mod ipfailover;
pub mod manage_node;
pub mod new_project;
pub mod node_config;
pub mod options;
pub mod overwrite_bootstrap_policy;
pub mod policy;
pub mod prune;
pub mod registry;
pub mod router;
pub mod version;

/// Fetch a required string argument. Requiredness is enforced by clap, so a
/// missing value can only mean the arg id is wrong; the empty string keeps
/// that a test-visible defect instead of a panic.
pub(crate) fn required_str<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

pub(crate) fn required_path(matches: &ArgMatches, id: &str) -> PathBuf {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .unwrap_or_default()
}

pub(crate) fn path_arg<'a>(matches: &'a ArgMatches, id: &str) -> Option<&'a Path> {
    matches.get_one::<PathBuf>(id).map(PathBuf::as_path)
}

/// Split a comma-separated flag value, dropping empty segments.
pub(crate) fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
