//! `build-chain` - show the build dependency graph for an image tag.

use clap::{Arg, ArgMatches, Command};
use std::collections::{BTreeMap, BTreeSet};

use crate::admin::Context;
use crate::error::{CliError, Result};
use crate::factory::Factory;
use tessera_core::client::BuildChain;

use super::required_str;

pub const NAME: &str = "build-chain";

pub fn command(ctx: &Context) -> Command {
    Command::new(NAME)
        .about("Output the inputs and dependencies of builds")
        .long_about(
            "Query the chain of builds triggered when the given image tag \
             changes, and render it as a tree or as a DOT graph.",
        )
        .after_help(format!(
            "Examples:\n  {} {NAME} web/base:latest --output=dot",
            ctx.full_name
        ))
        .arg(
            Arg::new("image")
                .value_name("IMAGE")
                .required(true)
                .help("Image tag to start the chain from"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("FORMAT")
                .value_parser(["tree", "dot"])
                .default_value("tree")
                .help("Output format"),
        )
}

fn children(chain: &BuildChain) -> BTreeMap<&str, Vec<&str>> {
    let mut map: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for edge in &chain.edges {
        map.entry(edge.from.as_str()).or_default().push(edge.to.as_str());
    }
    map
}

fn render_tree(chain: &BuildChain) -> String {
    fn visit<'a>(
        node: &'a str,
        depth: usize,
        children: &BTreeMap<&'a str, Vec<&'a str>>,
        path: &mut BTreeSet<&'a str>,
        out: &mut String,
    ) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(node);
        // A node already on the current path means the server sent a cycle;
        // label it and stop instead of recursing forever.
        if !path.insert(node) {
            out.push_str(" (cycle)\n");
            return;
        }
        out.push('\n');
        for child in children.get(node).into_iter().flatten() {
            visit(child, depth + 1, children, path, out);
        }
        path.remove(node);
    }
    let mut out = String::new();
    let mut path = BTreeSet::new();
    visit(&chain.root, 0, &children(chain), &mut path, &mut out);
    out
}

fn render_dot(chain: &BuildChain) -> String {
    let mut out = String::from("digraph build_chain {\n");
    for edge in &chain.edges {
        out.push_str(&format!("  \"{}\" -> \"{}\";\n", edge.from, edge.to));
    }
    out.push_str("}\n");
    out
}

pub async fn run(factory: &Factory, matches: &ArgMatches) -> Result<()> {
    let client = factory.api_client(matches)?;
    let image = required_str(matches, "image");
    let chain = client.build_chain(image).await?;
    if chain.edges.is_empty() {
        return Err(CliError::validation_with_help(
            format!("no builds depend on {image}"),
            "check the tag name against your image streams",
        ));
    }
    let rendered = match required_str(matches, "output") {
        "dot" => render_dot(&chain),
        _ => render_tree(&chain),
    };
    print!("{rendered}");
    Ok(())
}
