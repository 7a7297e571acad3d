//! `new-project` - create a project with an optional initial admin.

use clap::{Arg, ArgMatches, Command};

use crate::admin::Context;
use crate::display;
use crate::error::Result;
use crate::factory::Factory;
use tessera_core::policy::{RoleBindingChange, SubjectKind};
use tessera_core::project::ProjectRequest;

use super::required_str;

pub const NAME: &str = "new-project";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Create a new project")
        .long_about(
            "Create a new project on the cluster. When --admin is given, the user is \
             bound to the admin role inside the new project in the same request flow.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} web-team --display-name=\"Web Team\" --admin=alice",
            ctx.full_name
        ))
        .arg(
            Arg::new("name")
                .value_name("NAME")
                .required(true)
                .help("Project name"),
        )
        .arg(
            Arg::new("display-name")
                .long("display-name")
                .value_name("TEXT")
                .help("Display name shown in consoles"),
        )
        .arg(
            Arg::new("description")
                .long("description")
                .value_name("TEXT")
                .help("Project description"),
        )
        .arg(
            Arg::new("admin")
                .long("admin")
                .value_name("USER")
                .help("User to bind to the admin role in the new project"),
        )
        .arg(
            Arg::new("admin-role")
                .long("admin-role")
                .value_name("ROLE")
                .default_value("admin")
                .help("Role to bind the admin user to"),
        )
        .arg(
            Arg::new("node-selector")
                .long("node-selector")
                .value_name("SELECTOR")
                .help("Node selector applied to all pods in the project"),
        )
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    let client = factory.api_client(matches)?;
    let name = required_str(matches, "name");

    let request = ProjectRequest {
        name: name.to_string(),
        display_name: matches.get_one::<String>("display-name").cloned(),
        description: matches.get_one::<String>("description").cloned(),
        node_selector: matches.get_one::<String>("node-selector").cloned(),
    };
    let project = client.create_project(&request).await?;
    display::success(&format!("Created project {}", project.name));

    if let Some(admin) = matches.get_one::<String>("admin") {
        let change = RoleBindingChange {
            role: required_str(matches, "admin-role").to_string(),
            subject_kind: SubjectKind::User,
            subject_name: admin.clone(),
        };
        client.add_role_binding(name, &change).await?;
        display::success(&format!("Added {} to role {} in {}", admin, change.role, name));
    }
    Ok(())
}
