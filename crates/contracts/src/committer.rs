//! Committer trait - the capability every pluggable unit of work exposes
//!
//! A committer accepts add/remove intents for documents and later commits
//! them to whatever sink it represents.

use bytes::Bytes;
use std::cell::RefCell;
use std::rc::Rc;

use crate::{ConfigRoundTrip, ContractError, Metadata};

/// Committer capability
///
/// Calls run to completion on the caller's thread. Queued state, files and
/// connections belong to the implementation.
pub trait Committer {
    /// Queue a document for addition
    ///
    /// # Errors
    /// Returns the queuing failure (should include context)
    fn queue_add(
        &mut self,
        reference: &str,
        content: &Bytes,
        metadata: &Metadata,
    ) -> Result<(), ContractError>;

    /// Queue a document for removal
    fn queue_remove(
        &mut self,
        reference: &str,
        content: &Bytes,
        metadata: &Metadata,
    ) -> Result<(), ContractError>;

    /// Flush queued intents to the target
    fn commit(&mut self) -> Result<(), ContractError>;

    /// Short human-readable label (used for logging/metrics)
    fn label(&self) -> &str;

    /// Configuration round-trip support, if any
    fn as_round_trip(&self) -> Option<&dyn ConfigRoundTrip> {
        None
    }

    /// Mutable configuration round-trip support, if any
    fn as_round_trip_mut(&mut self) -> Option<&mut dyn ConfigRoundTrip> {
        None
    }
}

/// Shared handle to a committer
///
/// Identity is the allocation: two handles are the same member iff
/// [`Rc::ptr_eq`] holds.
pub type SharedCommitter = Rc<RefCell<dyn Committer>>;

/// Wrap a committer into a [`SharedCommitter`]
pub fn shared<C: Committer + 'static>(committer: C) -> SharedCommitter {
    Rc::new(RefCell::new(committer))
}

/// Identity comparison for shared committers
pub fn same_committer(a: &SharedCommitter, b: &SharedCommitter) -> bool {
    Rc::ptr_eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Committer for Noop {
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
            "noop"
        }
    }

    #[test]
    fn test_identity_is_by_allocation() {
        let a = shared(Noop);
        let a2 = Rc::clone(&a);
        let b = shared(Noop);

        assert!(same_committer(&a, &a2));
        assert!(!same_committer(&a, &b));
    }

    #[test]
    fn test_round_trip_is_opt_in() {
        let committer = shared(Noop);
        assert!(committer.borrow().as_round_trip().is_none());
        assert!(committer.borrow_mut().as_round_trip_mut().is_none());
    }
}
