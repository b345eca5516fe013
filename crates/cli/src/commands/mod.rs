//! Command implementations.

mod info;
mod regenerate;
mod submit;
mod validate;

pub use info::run_info;
pub use regenerate::run_regenerate;
pub use submit::run_submit;
pub use validate::run_validate;

use std::path::Path;

use committer_factory::CommitterRegistry;
use config_loader::{ConfigFragment, ConfigLoader};
use dispatcher::CompositeDispatcher;
use tracing::info;

use crate::error::{CliError, Result};

/// Load and validate a configuration, then build the committer tree from it
pub(crate) fn load_tree(
    path: &Path,
    registry: &CommitterRegistry,
) -> Result<(ConfigFragment, CompositeDispatcher)> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }

    let fragment = ConfigLoader::load_from_path(path)?;
    let dispatcher = CompositeDispatcher::from_config(&fragment, registry)?;

    info!(
        config = %path.display(),
        root = %fragment.class,
        members = dispatcher.len(),
        "Committer tree loaded"
    );
    Ok((fragment, dispatcher))
}
