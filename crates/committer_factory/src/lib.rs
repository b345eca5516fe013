//! # Committer Factory
//!
//! Committer 类注册表模块。
//!
//! Responsibilities:
//! - Map stable class identifiers to committer constructors
//! - Instantiate committers by name while a configuration is loaded
//! - Register the builtin committers shipped with `dispatcher`

pub mod error;
pub mod registry;

pub use contracts::{CommitterFactory, SharedCommitter};
pub use error::{FactoryError, Result};
pub use registry::{CommitterConstructor, CommitterRegistry};
