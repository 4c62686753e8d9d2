use crate::context::Context;
use crate::tracker::{LatencyTracker, LogFn};
use chrono::{DateTime, Utc};

/// 追踪所在作用域的耗时：创建时记录开始时间，释放时输出
pub struct TrackGuard<'a> {
    tracker: &'a LatencyTracker,
    ctx: Context,
    name: String,
    start: DateTime<Utc>,
    logger: Option<LogFn>,
}

impl<'a> TrackGuard<'a> {
    pub(crate) fn new(tracker: &'a LatencyTracker, ctx: Context, name: String) -> Self {
        Self {
            tracker,
            ctx,
            name,
            start: time::now(),
            logger: None,
        }
    }

    /// 改用 `logger` 输出，不用 tracker 配置的日志函数
    pub fn with_logger(mut self, logger: LogFn) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TrackGuard<'_> {
    fn drop(&mut self) {
        self.tracker
            .track(&self.ctx, self.start, &self.name, self.logger.take());
    }
}
