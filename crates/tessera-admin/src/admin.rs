//! Assembly of the administrative command tree.
//!
//! The tree is driven by a fixed registration table: each entry names a
//! subcommand and the constructor that builds it. `tesseradm` runs the tree
//! standalone today, but the builder keeps the name it is mounted under
//! separate from the full invocation path so the same tree can be embedded
//! under a larger binary later.

use clap::error::ErrorKind;
use clap::{ArgMatches, Command};
use std::io::Write;

use crate::commands;
use crate::error::{CliError, Result};
use crate::exit_codes;
use crate::factory::Factory;
use crate::output::Output;

/// Naming context threaded to every command constructor so help text and
/// examples show the path the user actually typed.
#[derive(Debug, Clone)]
pub struct Context {
    pub full_name: String,
}

struct Registration {
    name: &'static str,
    build: fn(&Context) -> Command,
}

/// Every subcommand, in the order it appears in help. `version` and
/// `options` are appended separately by [`AdminCommand::command`].
const REGISTRY: &[Registration] = &[
    Registration {
        name: commands::new_project::NAME,
        build: commands::new_project::command,
    },
    Registration {
        name: commands::policy::NAME,
        build: commands::policy::command,
    },
    Registration {
        name: commands::ipfailover::NAME,
        build: commands::ipfailover::command,
    },
    Registration {
        name: commands::router::NAME,
        build: commands::router::command,
    },
    Registration {
        name: commands::registry::NAME,
        build: commands::registry::command,
    },
    Registration {
        name: commands::build_chain::NAME,
        build: commands::build_chain::command,
    },
    Registration {
        name: commands::manage_node::NAME,
        build: commands::manage_node::command,
    },
    Registration {
        name: commands::config::NAME,
        build: commands::config::command,
    },
    Registration {
        name: commands::prune::NAME,
        build: commands::prune::command,
    },
    Registration {
        name: commands::create_kubeconfig::NAME,
        build: commands::create_kubeconfig::command,
    },
    Registration {
        name: commands::create_bootstrap_policy_file::NAME,
        build: commands::create_bootstrap_policy_file::command,
    },
    Registration {
        name: commands::create_bootstrap_project_template::NAME,
        build: commands::create_bootstrap_project_template::command,
    },
    Registration {
        name: commands::overwrite_bootstrap_policy::NAME,
        build: commands::overwrite_bootstrap_policy::command,
    },
    Registration {
        name: commands::node_config::NAME,
        build: commands::node_config::command,
    },
    Registration {
        name: commands::create_master_certs::NAME,
        build: commands::create_master_certs::command,
    },
    Registration {
        name: commands::create_client::NAME,
        build: commands::create_client::command,
    },
    Registration {
        name: commands::create_key_pair::NAME,
        build: commands::create_key_pair::command,
    },
    Registration {
        name: commands::create_server_cert::NAME,
        build: commands::create_server_cert::command,
    },
    Registration {
        name: commands::create_signer_cert::NAME,
        build: commands::create_signer_cert::command,
    },
];

/// The administrative command tree, ready to parse and dispatch.
pub struct AdminCommand {
    name: String,
    context: Context,
    factory: Factory,
    out: Output,
}

impl AdminCommand {
    /// `name` is what the command is mounted as; `full_name` the complete
    /// invocation path. They differ when the tree is embedded under another
    /// binary, and the standalone `version` leaf only exists when they
    /// match, so an embedding host keeps a single authoritative version.
    pub fn new(name: &str, full_name: &str, out: Output) -> Self {
        Self {
            name: name.to_string(),
            context: Context {
                full_name: full_name.to_string(),
            },
            factory: Factory,
            out,
        }
    }

    /// Build the clap command tree. Pure assembly: no I/O happens here.
    pub fn command(&self) -> Command {
        let mut root = Factory::register(
            Command::new(self.name.clone())
                .about("Tools for managing a Tessera platform")
                .long_about(
                    "Administrative commands for a Tessera platform: project \
                     and policy management, infrastructure components, node \
                     operations, and certificate generation.",
                )
                .disable_version_flag(true)
                .subcommand_required(false),
        );
        for registration in REGISTRY {
            root = root.subcommand((registration.build)(&self.context));
        }
        if self.name == self.context.full_name {
            root = root.subcommand(commands::version::command(&self.context));
        }
        root.subcommand(commands::options::command(&self.context))
    }

    /// Parse `argv` and run the selected subcommand. Returns the process
    /// exit code for outcomes that are not errors: help and a bare
    /// invocation print usage to the output sink and exit zero.
    pub async fn run(&mut self, argv: &[String]) -> Result<i32> {
        let mut command = self.command();
        let matches = match command.clone().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                write!(self.out, "{}", err.render())?;
                return Ok(exit_codes::SUCCESS);
            }
            Err(err) => {
                eprint!("{}", err.render());
                return Ok(exit_codes::USAGE_ERROR);
            }
        };

        let Some((name, sub_matches)) = matches.subcommand() else {
            write!(self.out, "{}", command.render_help())?;
            return Ok(exit_codes::SUCCESS);
        };
        self.dispatch(name, sub_matches).await?;
        Ok(exit_codes::SUCCESS)
    }

    async fn dispatch(&mut self, name: &str, matches: &ArgMatches) -> Result<()> {
        match name {
            commands::new_project::NAME => commands::new_project::run(&self.factory, matches).await,
            commands::policy::NAME => commands::policy::run(&self.factory, matches).await,
            commands::ipfailover::NAME => commands::ipfailover::run(&self.factory, matches).await,
            commands::router::NAME => commands::router::run(&self.factory, matches).await,
            commands::registry::NAME => commands::registry::run(&self.factory, matches).await,
            commands::build_chain::NAME => commands::build_chain::run(&self.factory, matches).await,
            commands::manage_node::NAME => commands::manage_node::run(&self.factory, matches).await,
            commands::config::NAME => commands::config::run(matches),
            commands::prune::NAME => commands::prune::run(&self.factory, matches).await,
            commands::create_kubeconfig::NAME => commands::create_kubeconfig::run(matches),
            commands::create_bootstrap_policy_file::NAME => {
                commands::create_bootstrap_policy_file::run(matches)
            }
            commands::create_bootstrap_project_template::NAME => {
                commands::create_bootstrap_project_template::run(matches)
            }
            commands::overwrite_bootstrap_policy::NAME => {
                commands::overwrite_bootstrap_policy::run(&self.factory, matches).await
            }
            commands::node_config::NAME => commands::node_config::run(matches),
            commands::create_master_certs::NAME => commands::create_master_certs::run(matches),
            commands::create_client::NAME => commands::create_client::run(matches),
            commands::create_key_pair::NAME => commands::create_key_pair::run(matches),
            commands::create_server_cert::NAME => commands::create_server_cert::run(matches),
            commands::create_signer_cert::NAME => commands::create_signer_cert::run(matches),
            commands::version::NAME => commands::version::run(&self.context, &mut self.out),
            commands::options::NAME => commands::options::run(&self.context, &mut self.out),
            other => Err(CliError::internal(format!(
                "subcommand {other} is registered but has no handler"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::TestBuffer;

    fn standalone() -> AdminCommand {
        AdminCommand::new("tesseradm", "tesseradm", Output::stdout())
    }

    fn embedded() -> AdminCommand {
        AdminCommand::new("admin", "tessera admin", Output::stdout())
    }

    fn child_names(admin: &AdminCommand) -> Vec<String> {
        admin
            .command()
            .get_subcommands()
            .map(|c| c.get_name().to_string())
            .collect()
    }

    // The published command surface. A dropped, renamed, or reordered
    // registration must fail here, not just mirror the table.
    const EXPECTED_CHILDREN: [&str; 19] = [
        "new-project",
        "policy",
        "ipfailover",
        "router",
        "registry",
        "build-chain",
        "manage-node",
        "config",
        "prune",
        "create-kubeconfig",
        "create-bootstrap-policy-file",
        "create-bootstrap-project-template",
        "overwrite-bootstrap-policy",
        "node-config",
        "create-master-certs",
        "create-client",
        "create-key-pair",
        "create-server-cert",
        "create-signer-cert",
    ];

    #[test]
    fn test_children_match_published_surface_in_order() {
        let mut expected: Vec<&str> = EXPECTED_CHILDREN.to_vec();
        expected.extend(["version", "options"]);
        assert_eq!(child_names(&standalone()), expected);

        let mut expected: Vec<&str> = EXPECTED_CHILDREN.to_vec();
        expected.push("options");
        assert_eq!(child_names(&embedded()), expected);
    }

    #[test]
    fn test_no_duplicate_children() {
        let mut names = child_names(&standalone());
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn test_registry_names_match_built_commands() {
        let ctx = Context {
            full_name: "tesseradm".to_string(),
        };
        for registration in REGISTRY {
            assert_eq!((registration.build)(&ctx).get_name(), registration.name);
        }
    }

    #[test]
    fn test_version_present_only_when_standalone() {
        assert!(
            child_names(&standalone())
                .iter()
                .any(|n| n == commands::version::NAME)
        );
        assert!(
            !child_names(&embedded())
                .iter()
                .any(|n| n == commands::version::NAME)
        );
    }

    #[test]
    fn test_options_is_always_last() {
        for admin in [standalone(), embedded()] {
            let names = child_names(&admin);
            assert_eq!(names.last().map(String::as_str), Some(commands::options::NAME));
            assert_eq!(
                names.iter().filter(|n| *n == commands::options::NAME).count(),
                1
            );
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(child_names(&standalone()), child_names(&standalone()));
    }

    #[tokio::test]
    async fn test_bare_invocation_prints_usage_and_exits_zero() {
        let buffer = TestBuffer::new();
        let mut admin = AdminCommand::new("tesseradm", "tesseradm", Output::new(buffer.clone()));
        let code = admin.run(&["tesseradm".to_string()]).await.unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        let usage = buffer.contents();
        assert!(usage.contains("Usage:"));
        assert!(usage.contains(commands::new_project::NAME));
    }

    #[tokio::test]
    async fn test_help_flag_goes_to_sink() {
        let buffer = TestBuffer::new();
        let mut admin = AdminCommand::new("tesseradm", "tesseradm", Output::new(buffer.clone()));
        let code = admin
            .run(&["tesseradm".to_string(), "--help".to_string()])
            .await
            .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        assert!(buffer.contents().contains("Usage:"));
    }

    #[tokio::test]
    async fn test_unknown_subcommand_is_a_usage_error() {
        let buffer = TestBuffer::new();
        let mut admin = AdminCommand::new("tesseradm", "tesseradm", Output::new(buffer.clone()));
        let code = admin
            .run(&["tesseradm".to_string(), "does-not-exist".to_string()])
            .await
            .unwrap();
        assert_eq!(code, exit_codes::USAGE_ERROR);
        assert!(buffer.contents().is_empty());
    }

    #[tokio::test]
    async fn test_version_prints_full_name() {
        let buffer = TestBuffer::new();
        let mut admin = AdminCommand::new("tesseradm", "tesseradm", Output::new(buffer.clone()));
        let code = admin
            .run(&["tesseradm".to_string(), "version".to_string()])
            .await
            .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);
        assert!(buffer.contents().starts_with("tesseradm v"));
    }

    #[tokio::test]
    async fn test_embedded_tree_rejects_version() {
        let mut admin = AdminCommand::new("admin", "tessera admin", Output::stdout());
        let code = admin
            .run(&["admin".to_string(), "version".to_string()])
            .await
            .unwrap();
        assert_eq!(code, exit_codes::USAGE_ERROR);
    }
}
