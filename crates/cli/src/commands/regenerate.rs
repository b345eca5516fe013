//! `regenerate` command implementation.

use anyhow::{Context, Result};
use committer_factory::CommitterRegistry;
use config_loader::ConfigFormat;
use contracts::DiagnosticsSink;
use dispatcher::CompositeDispatcher;
use std::cell::RefCell;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

use crate::cli::RegenerateArgs;
use crate::commands::load_tree;

/// Keeps save warnings so they can be reported after the write
#[derive(Debug, Default)]
struct CollectingDiagnostics {
    warnings: RefCell<Vec<String>>,
}

impl DiagnosticsSink for CollectingDiagnostics {
    fn warn(&self, message: &str) {
        warn!(target: "committer::diagnostics", "{message}");
        self.warnings.borrow_mut().push(message.to_string());
    }
}

/// Execute the `regenerate` command
pub fn run_regenerate(args: &RegenerateArgs) -> Result<()> {
    info!(
        config = %args.config.display(),
        output = %args.output.display(),
        "Regenerating configuration"
    );

    let registry = CommitterRegistry::with_builtins();
    let (_, dispatcher) = load_tree(&args.config, &registry)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let skipped = regenerate(&dispatcher, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "✓ Regenerated {} -> {}",
        args.config.display(),
        args.output.display()
    );
    if !skipped.is_empty() {
        println!("\n⚠ Skipped:");
        for warning in &skipped {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

/// Save the live tree to `output`, returning the warnings raised on the way
fn regenerate(dispatcher: &CompositeDispatcher, output: &Path) -> crate::error::Result<Vec<String>> {
    let format = ConfigFormat::from_path(output)?;
    let diagnostics = CollectingDiagnostics::default();

    let file = File::create(output)?;
    dispatcher.save_to_writer(file, format, &diagnostics)?;

    Ok(diagnostics.warnings.into_inner())
}
