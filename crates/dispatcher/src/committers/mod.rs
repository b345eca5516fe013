//! Committer implementations
//!
//! Contains LogCommitter, FileSystemCommitter, and NilCommitter.

mod file;
mod log;
mod nil;

pub use self::file::{FileSystemCommitter, DEFAULT_DIRECTORY, FILESYSTEM_CLASS};
pub use self::log::{LogCommitter, LOG_CLASS};
pub use self::nil::{NilCommitter, NIL_CLASS};
