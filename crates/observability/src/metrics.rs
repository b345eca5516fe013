//! Committer 指标收集模块
//!
//! 记录分发、加载、保存过程中的运行指标。

use metrics::{counter, histogram};

/// 记录一次分发调用 (单个成员)
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_dispatch;
///
/// match member.commit() {
///     Ok(()) => record_dispatch("commit", member.label(), true),
///     Err(_) => record_dispatch("commit", member.label(), false),
/// }
/// ```
pub fn record_dispatch(operation: &str, committer: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "committer_dispatch_total",
        "operation" => operation.to_string(),
        "committer" => committer.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// 记录从配置加载的成员数量
pub fn record_members_loaded(count: usize) {
    counter!("committer_members_loaded_total").increment(count as u64);
}

/// 记录保存配置时被跳过的成员
pub fn record_save_skipped(committer: &str) {
    counter!(
        "committer_save_skipped_total",
        "committer" => committer.to_string()
    )
    .increment(1);
}

/// 记录提交耗时
pub fn record_commit_latency_ms(committer: &str, latency_ms: f64) {
    histogram!(
        "committer_commit_latency_ms",
        "committer" => committer.to_string()
    )
    .record(latency_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorders_without_installed_recorder() {
        // 未安装 recorder 时所有调用都是 no-op
        record_dispatch("queue_add", "log", true);
        record_dispatch("commit", "filesystem", false);
        record_members_loaded(3);
        record_save_skipped("custom");
        record_commit_latency_ms("filesystem", 1.5);
    }
}
