use crate::context::Context;
use crate::error::{LatencyError, Result};
use crate::guard::TrackGuard;
use crate::tracker::{LatencyTracker, LogFn};
use chrono::{DateTime, Utc};
use std::sync::OnceLock;

// 进程级默认 tracker，只初始化一次，之后只读
static DEFAULT_TRACKER: OnceLock<LatencyTracker> = OnceLock::new();

/// 进程级 tracker，首次使用时按默认配置创建
pub fn default_tracker() -> &'static LatencyTracker {
    DEFAULT_TRACKER.get_or_init(LatencyTracker::new)
}

/// 设置进程级 tracker，必须在第一次 `track`/`default_tracker` 之前调用
pub fn install_default(tracker: LatencyTracker) -> Result<()> {
    DEFAULT_TRACKER
        .set(tracker)
        .map_err(|_| LatencyError::AlreadyInitialized)
}

/// 使用进程级 tracker 的 `LatencyTracker::track`
pub fn track(ctx: &Context, start: DateTime<Utc>, name: &str, logger: Option<LogFn>) {
    default_tracker().track(ctx, start, name, logger);
}

pub fn guard<S: Into<String>>(ctx: &Context, name: S) -> TrackGuard<'static> {
    default_tracker().guard(ctx, name)
}
