//! FileSystemCommitter - writes committed intents to disk with folder structure
//!
//! Layout under the configured directory:
//!
//! ```text
//! add/<batch>-<seq>.ref          reference
//! add/<batch>-<seq>.meta.json    metadata
//! add/<batch>-<seq>.content      document bytes
//! remove/<batch>-<seq>.ref
//! remove/<batch>-<seq>.meta.json
//! ```

use contracts::{
    Bytes, Committer, ConfigFragment, ConfigRoundTrip, ContractError, LoadContext, Metadata,
    SaveContext,
};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, instrument};

/// Class identifier of [`FileSystemCommitter`]
pub const FILESYSTEM_CLASS: &str = "dispatcher::FileSystemCommitter";

/// Directory used when the configuration does not name one
pub const DEFAULT_DIRECTORY: &str = "./committed-files";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntentKind {
    Add,
    Remove,
}

impl IntentKind {
    fn dir_name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone)]
struct QueuedIntent {
    kind: IntentKind,
    reference: String,
    content: Option<Bytes>,
    metadata: Metadata,
}

/// Committer that writes queued intents to disk files on commit
#[derive(Debug)]
pub struct FileSystemCommitter {
    directory: PathBuf,
    queue: Vec<QueuedIntent>,
    /// Sequence number of the next written intent, never reset
    next_seq: u64,
}

impl Default for FileSystemCommitter {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORY)
    }
}

impl FileSystemCommitter {
    /// Create a new FileSystemCommitter
    ///
    /// Nothing touches the disk until the first commit.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            queue: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of intents waiting for the next commit
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn enqueue(
        &mut self,
        kind: IntentKind,
        reference: &str,
        content: Option<&Bytes>,
        metadata: &Metadata,
    ) {
        self.queue.push(QueuedIntent {
            kind,
            reference: reference.to_string(),
            content: content.cloned(),
            metadata: metadata.clone(),
        });
    }

    fn write_queue_to_disk(&mut self) -> std::io::Result<()> {
        let batch = chrono::Utc::now().format("%Y%m%d%H%M%S%3f").to_string();

        for kind in [IntentKind::Add, IntentKind::Remove] {
            if self.queue.iter().any(|intent| intent.kind == kind) {
                fs::create_dir_all(self.directory.join(kind.dir_name()))?;
            }
        }

        for intent in &self.queue {
            let seq = self.next_seq;
            self.next_seq += 1;
            let stem = self
                .directory
                .join(intent.kind.dir_name())
                .join(format!("{batch}-{seq:06}"));
            write_intent(&stem, intent)?;
        }
        Ok(())
    }
}

/// Existing files are never overwritten; a name collision fails the commit
fn write_intent(stem: &Path, intent: &QueuedIntent) -> std::io::Result<()> {
    create_new(&stem.with_extension("ref"))?.write_all(intent.reference.as_bytes())?;

    let meta_file = create_new(&stem.with_extension("meta.json"))?;
    serde_json::to_writer_pretty(meta_file, &intent.metadata)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    if let Some(content) = &intent.content {
        create_new(&stem.with_extension("content"))?.write_all(content)?;
    }
    Ok(())
}

fn create_new(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

impl Committer for FileSystemCommitter {
    fn queue_add(
        &mut self,
        reference: &str,
        content: &Bytes,
        metadata: &Metadata,
    ) -> Result<(), ContractError> {
        self.enqueue(IntentKind::Add, reference, Some(content), metadata);
        Ok(())
    }

    fn queue_remove(
        &mut self,
        reference: &str,
        _content: &Bytes,
        metadata: &Metadata,
    ) -> Result<(), ContractError> {
        self.enqueue(IntentKind::Remove, reference, None, metadata);
        Ok(())
    }

    #[instrument(
        name = "filesystem_committer_commit",
        skip(self),
        fields(directory = %self.directory.display(), pending = self.queue.len())
    )]
    fn commit(&mut self) -> Result<(), ContractError> {
        if self.queue.is_empty() {
            return Ok(());
        }

        let started = Instant::now();
        self.write_queue_to_disk().map_err(|e| {
            error!(error = %e, "Write failed");
            ContractError::commit_failed(self.label(), e.to_string())
        })?;

        let committed = self.queue.len();
        self.queue.clear();

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        observability::record_commit_latency_ms(self.label(), elapsed_ms);
        debug!(committed, elapsed_ms, "FileSystemCommitter committed");
        Ok(())
    }

    fn label(&self) -> &str {
        "filesystem"
    }

    fn as_round_trip(&self) -> Option<&dyn ConfigRoundTrip> {
        Some(self)
    }

    fn as_round_trip_mut(&mut self) -> Option<&mut dyn ConfigRoundTrip> {
        Some(self)
    }
}

impl ConfigRoundTrip for FileSystemCommitter {
    fn class_name(&self) -> &str {
        FILESYSTEM_CLASS
    }

    fn load_from_config(
        &mut self,
        fragment: &ConfigFragment,
        _ctx: &LoadContext<'_>,
    ) -> Result<(), ContractError> {
        if let Some(directory) = fragment.str_param("directory")? {
            if directory.trim().is_empty() {
                return Err(ContractError::config_validation(
                    format!("{}.directory", fragment.class),
                    "directory cannot be empty",
                ));
            }
            self.directory = PathBuf::from(directory);
        }
        Ok(())
    }

    fn save_to_config(&self, _ctx: &SaveContext<'_>) -> Result<ConfigFragment, ContractError> {
        let directory = self.directory.to_str().ok_or_else(|| {
            ContractError::config_serialize(format!(
                "directory {} is not valid UTF-8",
                self.directory.display()
            ))
        })?;
        Ok(ConfigFragment::new(FILESYSTEM_CLASS).with_param("directory", directory))
    }
}
