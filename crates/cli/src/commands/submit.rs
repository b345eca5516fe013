//! `submit` command implementation.
//!
//! Every regular file of the input directory becomes one document: the file
//! path is its reference, the file bytes its content.

use anyhow::{Context, Result};
use committer_factory::CommitterRegistry;
use contracts::{Bytes, Committer, Metadata};
use dispatcher::{CompositeDispatcher, MetricsSnapshot};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cli::SubmitArgs;
use crate::commands::load_tree;
use crate::error::CliError;

/// Execute the `submit` command
pub fn run_submit(args: &SubmitArgs) -> Result<()> {
    info!(
        config = %args.config.display(),
        input = %args.input.display(),
        remove = args.remove,
        batch_size = args.batch_size,
        "Submitting documents"
    );

    let registry = CommitterRegistry::with_builtins();
    let (_, mut dispatcher) = load_tree(&args.config, &registry)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let submitted = submit_directory(&mut dispatcher, args)
        .with_context(|| format!("Failed to submit {}", args.input.display()))?;

    print_summary(submitted, args.remove, &dispatcher.metrics());
    Ok(())
}

/// Queue every file of the input directory, committing per batch and at the end
fn submit_directory(
    dispatcher: &mut CompositeDispatcher,
    args: &SubmitArgs,
) -> crate::error::Result<usize> {
    let files = list_files(&args.input)?;

    for (index, path) in files.iter().enumerate() {
        let content = Bytes::from(fs::read(path)?);
        let metadata = file_metadata(path, content.len());
        let reference = path.display().to_string();

        if args.remove {
            dispatcher.queue_remove(&reference, &content, &metadata)?;
        } else {
            dispatcher.queue_add(&reference, &content, &metadata)?;
        }
        debug!(reference = %reference, bytes = content.len(), "document queued");

        if args.batch_size > 0 && (index + 1) % args.batch_size == 0 {
            dispatcher.commit()?;
            info!(submitted = index + 1, "batch committed");
        }
    }

    dispatcher.commit()?;
    Ok(files.len())
}

/// Regular files of `dir`, sorted by path
fn list_files(dir: &Path) -> crate::error::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CliError::input_not_directory(dir.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_metadata(path: &Path, size: usize) -> Metadata {
    let mut metadata = Metadata::new();
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        metadata.set("filename", name);
    }
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        metadata.set("extension", ext);
    }
    metadata.set("size", size.to_string());
    metadata
}

fn print_summary(submitted: usize, remove: bool, metrics: &MetricsSnapshot) {
    let action = if remove { "removals" } else { "additions" };
    println!("✓ Submitted {} {}", submitted, action);
    println!("  ├─ Member adds: {}", metrics.add_count);
    println!("  ├─ Member removes: {}", metrics.remove_count);
    println!("  ├─ Member commits: {}", metrics.commit_count);
    println!("  └─ Failures: {}", metrics.failure_count);
}
