//! `policy` - manage role bindings and inspect access.

use clap::{Arg, ArgMatches, Command};

use crate::admin::Context;
use crate::display;
use crate::error::{CliError, Result};
use crate::factory::Factory;
use tessera_core::config::DEFAULT_NAMESPACE;
use tessera_core::policy::{RoleBindingChange, SubjectKind, WhoCanResult};

use super::required_str;

pub const NAME: &str = "policy";

fn binding_command(name: &'static str, about: &'static str, subject: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(Arg::new("role").value_name("ROLE").required(true))
        .arg(
            Arg::new("subjects")
                .value_name(subject)
                .required(true)
                .num_args(1..),
        )
}

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Manage authorization policy")
        .after_help(format!(
            "Examples:\n  {} {NAME} add-role-to-user admin alice -n web",
            ctx.full_name
        ))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(binding_command(
            "add-role-to-user",
            "Add a role to users in the current namespace",
            "USER",
        ))
        .subcommand(binding_command(
            "remove-role-from-user",
            "Remove a role from users in the current namespace",
            "USER",
        ))
        .subcommand(binding_command(
            "add-role-to-group",
            "Add a role to groups in the current namespace",
            "GROUP",
        ))
        .subcommand(binding_command(
            "remove-role-from-group",
            "Remove a role from groups in the current namespace",
            "GROUP",
        ))
        .subcommand(
            Command::new("who-can")
                .about("List who can perform a verb on a resource")
                .arg(Arg::new("verb").value_name("VERB").required(true))
                .arg(Arg::new("resource").value_name("RESOURCE").required(true)),
        )
}

fn namespace(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("namespace")
        .cloned()
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
}

async fn change_bindings(
    factory: &Factory,
    matches: &ArgMatches,
    sub: &ArgMatches,
    kind: SubjectKind,
    add: bool,
) -> Result<()> {
    let client = factory.api_client(matches)?;
    let ns = namespace(matches);
    let role = required_str(sub, "role");
    let subjects: Vec<&String> = sub
        .get_many::<String>("subjects")
        .map(Iterator::collect)
        .unwrap_or_default();

    for subject in subjects {
        let change = RoleBindingChange {
            role: role.to_string(),
            subject_kind: kind,
            subject_name: subject.clone(),
        };
        if add {
            client.add_role_binding(&ns, &change).await?;
            display::success(&format!("Added {kind} {subject} to role {role} in {ns}"));
        } else {
            client.remove_role_binding(&ns, &change).await?;
            display::success(&format!("Removed {kind} {subject} from role {role} in {ns}"));
        }
    }
    Ok(())
}

fn print_who_can(result: &WhoCanResult, verb: &str, resource: &str, ns: &str) {
    println!("Who can {verb} {resource} in {ns}:");
    if result.users.is_empty() && result.groups.is_empty() {
        display::note("no users or groups");
        return;
    }
    for user in &result.users {
        println!("  User  {user}");
    }
    for group in &result.groups {
        println!("  Group {group}");
    }
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("add-role-to-user", sub)) => {
            change_bindings(factory, matches, sub, SubjectKind::User, true).await
        }
        Some(("remove-role-from-user", sub)) => {
            change_bindings(factory, matches, sub, SubjectKind::User, false).await
        }
        Some(("add-role-to-group", sub)) => {
            change_bindings(factory, matches, sub, SubjectKind::Group, true).await
        }
        Some(("remove-role-from-group", sub)) => {
            change_bindings(factory, matches, sub, SubjectKind::Group, false).await
        }
        Some(("who-can", sub)) => {
            let client = factory.api_client(matches)?;
            let ns = namespace(matches);
            let verb = required_str(sub, "verb");
            let resource = required_str(sub, "resource");
            let result = client.who_can(&ns, verb, resource).await?;
            print_who_can(&result, verb, resource, &ns);
            Ok(())
        }
        _ => Err(CliError::internal("unregistered policy subcommand")),
    }
}
