//! CompositeDispatcher - fans committer operations out to an ordered member list
//!
//! Members are invoked strictly in registration order. The first member
//! failure aborts the call: later members never see that operation, earlier
//! members keep whatever they already did. There is no rollback.

use std::fmt;
use std::io::{Read, Write};
use std::rc::Rc;

use config_loader::{ConfigFormat, ConfigLoader};
use contracts::{
    same_committer, Bytes, Committer, CommitterFactory, ConfigFragment, ConfigRoundTrip,
    ContractError, DiagnosticsSink, LoadContext, Metadata, SaveContext, SharedCommitter,
};
use tracing::{debug, instrument, warn};

use crate::metrics::{DispatchMetrics, DispatchOp, MetricsSnapshot};

/// Class identifier of [`CompositeDispatcher`]
pub const COMPOSITE_CLASS: &str = "dispatcher::CompositeDispatcher";

/// A committer made of other committers
#[derive(Default)]
pub struct CompositeDispatcher {
    members: Vec<SharedCommitter>,
    metrics: DispatchMetrics,
}

impl CompositeDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher from an initial member list
    pub fn with_members(members: Vec<SharedCommitter>) -> Self {
        Self {
            members,
            metrics: DispatchMetrics::new(),
        }
    }

    /// Build a dispatcher from a root `committer` fragment
    pub fn from_config(
        fragment: &ConfigFragment,
        factory: &dyn CommitterFactory,
    ) -> Result<Self, ContractError> {
        let mut dispatcher = Self::new();
        dispatcher.load_from_config(fragment, &LoadContext::new(factory))?;
        Ok(dispatcher)
    }

    /// Append one member
    pub fn add_member(&mut self, member: SharedCommitter) {
        self.members.push(member);
    }

    /// Append members, preserving iteration order
    pub fn add_members<I>(&mut self, members: I)
    where
        I: IntoIterator<Item = SharedCommitter>,
    {
        self.members.extend(members);
    }

    /// Remove every occurrence of `member` (by identity)
    pub fn remove_member(&mut self, member: &SharedCommitter) {
        self.members.retain(|m| !same_committer(m, member));
    }

    /// Remove every occurrence of each given member (by identity)
    pub fn remove_members(&mut self, members: &[SharedCommitter]) {
        self.members
            .retain(|m| !members.iter().any(|r| same_committer(m, r)));
    }

    /// Copy of the member list; changing it does not affect the dispatcher
    pub fn members(&self) -> Vec<SharedCommitter> {
        self.members.iter().map(Rc::clone).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Dispatch counters for this composite
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Parse a document from `reader` and append the members it describes
    ///
    /// Loading twice appends twice; start from a fresh dispatcher for a clean load.
    pub fn load_from_reader<R: Read>(
        &mut self,
        reader: R,
        format: ConfigFormat,
        factory: &dyn CommitterFactory,
    ) -> Result<(), ContractError> {
        let fragment = ConfigLoader::load_from_reader(reader, format)?;
        self.load_from_config(&fragment, &LoadContext::new(factory))
    }

    /// Write the member tree to `writer`
    ///
    /// Members without round-trip support are reported to `diagnostics` and
    /// left out of the document.
    pub fn save_to_writer<W: Write>(
        &self,
        writer: W,
        format: ConfigFormat,
        diagnostics: &dyn DiagnosticsSink,
    ) -> Result<(), ContractError> {
        let fragment = self.save_to_config(&SaveContext::new(diagnostics))?;
        ConfigLoader::write_to(writer, &fragment, format)
    }

    fn dispatch<F>(&self, op: DispatchOp, mut call: F) -> Result<(), ContractError>
    where
        F: FnMut(&mut dyn Committer) -> Result<(), ContractError>,
    {
        for (index, member) in self.members.iter().enumerate() {
            let mut committer = member
                .try_borrow_mut()
                .map_err(|_| ContractError::Reentrant {
                    operation: op.as_str(),
                })?;
            let label = committer.label().to_owned();

            match call(&mut *committer) {
                Ok(()) => {
                    debug!(member = index, committer = %label, op = op.as_str(), "dispatched");
                    self.metrics.record_success(op);
                    observability::record_dispatch(op.as_str(), &label, true);
                }
                Err(e) => {
                    warn!(
                        member = index,
                        committer = %label,
                        op = op.as_str(),
                        skipped = self.members.len() - index - 1,
                        error = %e,
                        "member failed, aborting dispatch"
                    );
                    self.metrics.record_failure();
                    observability::record_dispatch(op.as_str(), &label, false);
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<SharedCommitter>> for CompositeDispatcher {
    fn from(members: Vec<SharedCommitter>) -> Self {
        Self::with_members(members)
    }
}

impl fmt::Debug for CompositeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self
            .members
            .iter()
            .map(|m| match m.try_borrow() {
                Ok(c) => c.label().to_owned(),
                Err(_) => "<borrowed>".to_owned(),
            })
            .collect();
        f.debug_struct("CompositeDispatcher")
            .field("members", &labels)
            .finish()
    }
}

impl Committer for CompositeDispatcher {
    #[instrument(
        name = "composite_queue_add",
        skip(self, content, metadata),
        fields(members = self.members.len())
    )]
    fn queue_add(
        &mut self,
        reference: &str,
        content: &Bytes,
        metadata: &Metadata,
    ) -> Result<(), ContractError> {
        self.dispatch(DispatchOp::QueueAdd, |c| {
            c.queue_add(reference, content, metadata)
        })
    }

    #[instrument(
        name = "composite_queue_remove",
        skip(self, content, metadata),
        fields(members = self.members.len())
    )]
    fn queue_remove(
        &mut self,
        reference: &str,
        content: &Bytes,
        metadata: &Metadata,
    ) -> Result<(), ContractError> {
        self.dispatch(DispatchOp::QueueRemove, |c| {
            c.queue_remove(reference, content, metadata)
        })
    }

    #[instrument(name = "composite_commit", skip(self), fields(members = self.members.len()))]
    fn commit(&mut self) -> Result<(), ContractError> {
        self.dispatch(DispatchOp::Commit, |c| c.commit())
    }

    fn label(&self) -> &str {
        "composite"
    }

    fn as_round_trip(&self) -> Option<&dyn ConfigRoundTrip> {
        Some(self)
    }

    fn as_round_trip_mut(&mut self) -> Option<&mut dyn ConfigRoundTrip> {
        Some(self)
    }
}

impl ConfigRoundTrip for CompositeDispatcher {
    fn class_name(&self) -> &str {
        COMPOSITE_CLASS
    }

    /// Instantiate every child `committer` fragment and append it
    ///
    /// Members appended before a failure stay in place.
    #[instrument(
        name = "composite_load_from_config",
        skip(self, fragment, ctx),
        fields(class = %fragment.class, children = fragment.children.len(), depth = ctx.depth())
    )]
    fn load_from_config(
        &mut self,
        fragment: &ConfigFragment,
        ctx: &LoadContext<'_>,
    ) -> Result<(), ContractError> {
        if fragment.class != COMPOSITE_CLASS {
            debug!(class = %fragment.class, "loading composite from a fragment of another class");
        }
        if fragment.children.is_empty() {
            return Ok(());
        }

        let child_ctx = ctx.nested()?;
        for (index, child) in fragment.children.iter().enumerate() {
            let member = ctx.factory().instantiate(&child.class)?;
            {
                let mut committer =
                    member
                        .try_borrow_mut()
                        .map_err(|_| ContractError::Reentrant {
                            operation: "load_from_config",
                        })?;
                match committer.as_round_trip_mut() {
                    Some(configurable) => configurable.load_from_config(child, &child_ctx)?,
                    None if !child.params.is_empty() || !child.children.is_empty() => {
                        warn!(
                            member = index,
                            class = %child.class,
                            "committer does not support configuration, ignoring its fields"
                        );
                    }
                    None => {}
                }
            }
            debug!(member = index, class = %child.class, "member loaded");
            self.add_member(member);
        }

        observability::record_members_loaded(fragment.children.len());
        Ok(())
    }

    #[instrument(
        name = "composite_save_to_config",
        skip(self, ctx),
        fields(members = self.members.len(), depth = ctx.depth())
    )]
    fn save_to_config(&self, ctx: &SaveContext<'_>) -> Result<ConfigFragment, ContractError> {
        let mut fragment = ConfigFragment::new(COMPOSITE_CLASS);
        if self.members.is_empty() {
            return Ok(fragment);
        }

        let child_ctx = ctx.nested()?;
        for (index, member) in self.members.iter().enumerate() {
            let committer = member
                .try_borrow()
                .map_err(|_| ContractError::Reentrant {
                    operation: "save_to_config",
                })?;
            match committer.as_round_trip() {
                Some(configurable) => fragment
                    .children
                    .push(configurable.save_to_config(&child_ctx)?),
                None => {
                    ctx.diagnostics().warn(&format!(
                        "cannot save committer '{}' (member #{index}) to configuration: \
                         it does not support configuration round-trip, skipping it",
                        committer.label()
                    ));
                    observability::record_save_skipped(committer.label());
                }
            }
        }
        Ok(fragment)
    }
}
