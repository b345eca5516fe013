//! NilCommitter - accepts and discards everything

use contracts::{
    Bytes, Committer, ConfigFragment, ConfigRoundTrip, ContractError, LoadContext, Metadata,
    SaveContext,
};

/// Class identifier of [`NilCommitter`]
pub const NIL_CLASS: &str = "dispatcher::NilCommitter";

/// Committer that drops every intent
#[derive(Debug, Clone, Copy, Default)]
pub struct NilCommitter;

impl Committer for NilCommitter {
    fn queue_add(&mut self, _: &str, _: &Bytes, _: &Metadata) -> Result<(), ContractError> {
        Ok(())
    }

    fn queue_remove(&mut self, _: &str, _: &Bytes, _: &Metadata) -> Result<(), ContractError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    fn label(&self) -> &str {
        "nil"
    }

    fn as_round_trip(&self) -> Option<&dyn ConfigRoundTrip> {
        Some(self)
    }

    fn as_round_trip_mut(&mut self) -> Option<&mut dyn ConfigRoundTrip> {
        Some(self)
    }
}

impl ConfigRoundTrip for NilCommitter {
    fn class_name(&self) -> &str {
        NIL_CLASS
    }

    fn load_from_config(
        &mut self,
        _fragment: &ConfigFragment,
        _ctx: &LoadContext<'_>,
    ) -> Result<(), ContractError> {
        Ok(())
    }

    fn save_to_config(&self, _ctx: &SaveContext<'_>) -> Result<ConfigFragment, ContractError> {
        Ok(ConfigFragment::new(NIL_CLASS))
    }
}
