//! LogCommitter - logs every intent via tracing

use contracts::{
    Bytes, Committer, ConfigFragment, ConfigRoundTrip, ContractError, LoadContext, Metadata,
    SaveContext,
};
use tracing::{info, instrument};

/// Class identifier of [`LogCommitter`]
pub const LOG_CLASS: &str = "dispatcher::LogCommitter";

/// Committer that logs intents for debugging
#[derive(Debug, Clone)]
pub struct LogCommitter {
    name: String,
    pending_adds: usize,
    pending_removes: usize,
}

impl Default for LogCommitter {
    fn default() -> Self {
        Self::new("log")
    }
}

impl LogCommitter {
    /// Create a new LogCommitter with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pending_adds: 0,
            pending_removes: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Intents seen since the last commit (adds, removes)
    pub fn pending(&self) -> (usize, usize) {
        (self.pending_adds, self.pending_removes)
    }
}

impl Committer for LogCommitter {
    fn queue_add(
        &mut self,
        reference: &str,
        content: &Bytes,
        metadata: &Metadata,
    ) -> Result<(), ContractError> {
        self.pending_adds += 1;
        info!(
            committer = %self.name,
            reference,
            bytes = content.len(),
            metadata_keys = metadata.len(),
            "queued add"
        );
        Ok(())
    }

    fn queue_remove(
        &mut self,
        reference: &str,
        _content: &Bytes,
        _metadata: &Metadata,
    ) -> Result<(), ContractError> {
        self.pending_removes += 1;
        info!(committer = %self.name, reference, "queued remove");
        Ok(())
    }

    #[instrument(name = "log_committer_commit", skip(self), fields(committer = %self.name))]
    fn commit(&mut self) -> Result<(), ContractError> {
        info!(
            adds = self.pending_adds,
            removes = self.pending_removes,
            "commit"
        );
        self.pending_adds = 0;
        self.pending_removes = 0;
        Ok(())
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn as_round_trip(&self) -> Option<&dyn ConfigRoundTrip> {
        Some(self)
    }

    fn as_round_trip_mut(&mut self) -> Option<&mut dyn ConfigRoundTrip> {
        Some(self)
    }
}

impl ConfigRoundTrip for LogCommitter {
    fn class_name(&self) -> &str {
        LOG_CLASS
    }

    fn load_from_config(
        &mut self,
        fragment: &ConfigFragment,
        _ctx: &LoadContext<'_>,
    ) -> Result<(), ContractError> {
        if let Some(name) = fragment.str_param("name")? {
            self.name = name.to_string();
        }
        Ok(())
    }

    fn save_to_config(&self, _ctx: &SaveContext<'_>) -> Result<ConfigFragment, ContractError> {
        Ok(ConfigFragment::new(LOG_CLASS).with_param("name", self.name.as_str()))
    }
}
