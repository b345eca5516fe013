//! `validate` command implementation.

use anyhow::{Context, Result};
use committer_factory::CommitterRegistry;
use config_loader::ConfigFragment;
use dispatcher::{CompositeDispatcher, COMPOSITE_CLASS};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::commands::load_tree;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<TreeSummary>,
}

#[derive(Serialize, Debug, PartialEq)]
struct TreeSummary {
    root_class: String,
    member_count: usize,
    committer_count: usize,
    depth: usize,
    classes: Vec<String>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let registry = CommitterRegistry::with_builtins();
    let result = validate_config(args, &registry);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs, registry: &CommitterRegistry) -> ValidationResult {
    let config_path = args.config.display().to_string();

    match load_tree(&args.config, registry) {
        Ok((fragment, dispatcher)) => {
            let warnings = collect_warnings(&fragment, &dispatcher);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(summarize(&fragment)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(root: &ConfigFragment) -> TreeSummary {
    let mut classes = BTreeSet::new();
    let mut committer_count = 0;
    let mut pending = vec![root];
    while let Some(fragment) = pending.pop() {
        classes.insert(fragment.class.clone());
        committer_count += fragment.children.len();
        pending.extend(fragment.children.iter());
    }

    TreeSummary {
        root_class: root.class.clone(),
        member_count: root.children.len(),
        committer_count,
        depth: root.depth(),
        classes: classes.into_iter().collect(),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(root: &ConfigFragment, dispatcher: &CompositeDispatcher) -> Vec<String> {
    let mut warnings = Vec::new();

    if root.class != COMPOSITE_CLASS {
        warnings.push(format!(
            "Root class '{}' is not {} - only its nested committers are used",
            root.class, COMPOSITE_CLASS
        ));
    }

    if root.children.is_empty() {
        warnings.push("No committers configured - submitted documents go nowhere".to_string());
    }

    let mut pending = vec![root];
    while let Some(fragment) = pending.pop() {
        for child in &fragment.children {
            if child.class == COMPOSITE_CLASS && child.children.is_empty() {
                warnings.push("Nested composite without members".to_string());
            }
            pending.push(child);
        }
    }

    for (idx, member) in dispatcher.members().iter().enumerate() {
        let committer = member.borrow();
        if committer.as_round_trip().is_none() {
            warnings.push(format!(
                "Committer #{} ({}) cannot be saved back to configuration",
                idx,
                committer.label()
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Root: {}", summary.root_class);
            println!("  Members: {}", summary.member_count);
            println!("  Committers (all levels): {}", summary.committer_count);
            println!("  Depth: {}", summary.depth);
            println!("  Classes: {}", summary.classes.join(", "));
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
