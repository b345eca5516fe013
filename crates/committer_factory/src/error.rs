//! Committer Factory error types

use contracts::ContractError;
use thiserror::Error;

/// Committer Factory specific error
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Class identifier is empty or contains whitespace
    #[error("invalid committer class identifier '{class}'")]
    InvalidClass { class: String },

    /// A constructor is already registered under this identifier
    #[error("committer class '{class}' is already registered")]
    DuplicateClass { class: String },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl FactoryError {
    /// Create duplicate class error
    pub fn duplicate(class: impl Into<String>) -> Self {
        Self::DuplicateClass {
            class: class.into(),
        }
    }

    /// Create invalid class error
    pub fn invalid(class: impl Into<String>) -> Self {
        Self::InvalidClass {
            class: class.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, FactoryError>;
