//! `info` command implementation.

use anyhow::{Context, Result};
use committer_factory::CommitterRegistry;
use config_loader::ConfigFragment;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

use crate::cli::InfoArgs;
use crate::commands::load_tree;

/// Committer tree info for JSON output
#[derive(Serialize, Debug, PartialEq)]
struct CommitterInfo {
    class: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    members: Vec<CommitterInfo>,
}

impl CommitterInfo {
    fn from_fragment(fragment: &ConfigFragment, with_params: bool) -> Self {
        Self {
            class: fragment.class.clone(),
            params: if with_params {
                fragment.params.clone()
            } else {
                BTreeMap::new()
            },
            members: fragment
                .children
                .iter()
                .map(|child| Self::from_fragment(child, with_params))
                .collect(),
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let registry = CommitterRegistry::with_builtins();
    let (fragment, dispatcher) = load_tree(&args.config, &registry)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = CommitterInfo::from_fragment(&fragment, args.params);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize committer info")?;
        println!("{}", json);
    } else {
        println!("📤 {} ({} members)", fragment.class, dispatcher.len());
        for line in render_tree(&fragment, args.params) {
            println!("{}", line);
        }
        println!();
    }

    Ok(())
}

/// Render the children of `root` as box-drawing tree lines
fn render_tree(root: &ConfigFragment, with_params: bool) -> Vec<String> {
    let mut lines = Vec::new();
    render_children(root, "   ", with_params, &mut lines);
    lines
}

fn render_children(
    fragment: &ConfigFragment,
    indent: &str,
    with_params: bool,
    lines: &mut Vec<String>,
) {
    let count = fragment.children.len();
    for (i, child) in fragment.children.iter().enumerate() {
        let is_last = i == count - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_indent = format!("{}{}", indent, if is_last { "   " } else { "│  " });

        lines.push(format!("{}{} {}", indent, prefix, child.class));

        if with_params {
            for (key, value) in &child.params {
                lines.push(format!("{}   {} = {}", child_indent, key, value));
            }
        }

        render_children(child, &child_indent, with_params, lines);
    }
}
