//! # Contracts
//!
//! Frozen interface contracts, defining the traits and data structures shared
//! by committers, the composite dispatcher and the configuration layer.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Ownership Model
//! - Members are shared as `Rc<RefCell<dyn Committer>>`; identity is the allocation
//! - Everything runs on the owning thread, nothing here is `Send`

mod committer;
mod diagnostics;
mod error;
mod fragment;
mod metadata;
mod round_trip;

pub use bytes::Bytes;
pub use committer::{same_committer, shared, Committer, SharedCommitter};
pub use diagnostics::{DiagnosticsSink, TracingDiagnostics};
pub use error::*;
pub use fragment::{ConfigFragment, CHILD_KEY, CLASS_KEY};
pub use metadata::Metadata;
pub use round_trip::{
    CommitterFactory, ConfigRoundTrip, LoadContext, SaveContext, DEFAULT_MAX_DEPTH,
};
