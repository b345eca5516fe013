//! # Dispatcher
//!
//! Committer 分发模块。
//!
//! 负责：
//! - `CompositeDispatcher`: 按注册顺序把 add / remove / commit 分发给所有成员
//! - 从 `committer` 配置片段递归构建成员树，并无损保存回配置
//! - 内置 committers (Log / FileSystem / Nil)

pub mod committers;
pub mod composite;
pub mod metrics;

pub use committers::{
    FileSystemCommitter, LogCommitter, NilCommitter, DEFAULT_DIRECTORY, FILESYSTEM_CLASS,
    LOG_CLASS, NIL_CLASS,
};
pub use composite::{CompositeDispatcher, COMPOSITE_CLASS};
pub use contracts::{Committer, ConfigRoundTrip, SharedCommitter};
pub use metrics::{DispatchMetrics, DispatchOp, MetricsSnapshot};
