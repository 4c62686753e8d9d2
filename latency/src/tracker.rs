use crate::config::{Sink, TrackerConfig};
use crate::context::Context;
use crate::error::Result;
use crate::guard::TrackGuard;
use chrono::{DateTime, TimeDelta, Utc};
use log::Level;
use safe_spawn::SafeTask;
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// 日志函数：参数为增强后的 context 和格式化好的消息
pub type LogFn = Arc<dyn Fn(&Context, fmt::Arguments<'_>) + Send + Sync>;

/// 把调用方的 context 转换为交给日志函数的 context
pub type ContextEnhancer = Arc<dyn Fn(&Context) -> Context + Send + Sync>;

pub fn log_fn<F>(f: F) -> LogFn
where
    F: Fn(&Context, fmt::Arguments<'_>) + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn context_enhancer<F>(f: F) -> ContextEnhancer
where
    F: Fn(&Context) -> Context + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 默认日志函数：每条消息写一行到 stdout，忽略写入错误
pub fn stdout_log_fn() -> LogFn {
    log_fn(write_stdout)
}

/// 每条消息写一行到 writer，写入错误忽略
pub fn writer_log_fn<W: Write + Send + 'static>(writer: W) -> LogFn {
    let writer = Mutex::new(writer);
    log_fn(move |_, args| {
        let mut writer = match writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        write_line(&mut *writer, args);
    })
}

/// 通过 `log` 门面输出，context 带 trace id 时加 `[trace_id=..]` 前缀
pub fn log_facade<S: Into<String>>(level: Level, target: S) -> LogFn {
    let target = target.into();
    log_fn(move |ctx, args| match ctx.trace_id() {
        Some(trace_id) => {
            log::log!(target: target.as_str(), level, "[trace_id={}] {}", trace_id, args)
        }
        None => log::log!(target: target.as_str(), level, "{}", args),
    })
}

/// 原样传递调用方 context 的 enhancer
pub fn keep_context() -> ContextEnhancer {
    context_enhancer(Context::clone)
}

fn write_stdout(_: &Context, args: fmt::Arguments<'_>) {
    write_line(&mut std::io::stdout().lock(), args);
}

pub(crate) fn write_line<W: Write + ?Sized>(writer: &mut W, args: fmt::Arguments<'_>) {
    let _ = writeln!(writer, "{}", args);
    let _ = writer.flush();
}

// 默认丢弃调用方的 context，trace id 等不会传递到日志，需要时用 keep_context 或自定义 enhancer
fn background_context(_: &Context) -> Context {
    Context::background()
}

pub enum TrackerOption {
    Logger(LogFn),
    ContextEnhancer(ContextEnhancer),
}

pub fn with_logger<F>(f: F) -> TrackerOption
where
    F: Fn(&Context, fmt::Arguments<'_>) + Send + Sync + 'static,
{
    TrackerOption::Logger(log_fn(f))
}

pub fn with_context_enhancer<F>(f: F) -> TrackerOption
where
    F: Fn(&Context) -> Context + Send + Sync + 'static,
{
    TrackerOption::ContextEnhancer(context_enhancer(f))
}

/// 延迟追踪器：每次 track 在独立 worker 上输出一行耗时日志。
///
/// 默认日志写 stdout，并且默认 enhancer 会把调用方 context 换成 `Context::background()`，
/// 调用方携带的 trace id 不会出现在日志里。需要关联 trace 时安装 `keep_context()`
/// 或自定义 enhancer。
#[derive(Clone)]
pub struct LatencyTracker {
    log_fn: LogFn,
    context_enhancer: ContextEnhancer,
}

impl fmt::Debug for LatencyTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatencyTracker").finish_non_exhaustive()
    }
}

impl Default for LatencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl LatencyTracker {
    pub fn new() -> Self {
        Self {
            log_fn: stdout_log_fn(),
            context_enhancer: context_enhancer(background_context),
        }
    }

    /// 在默认值上按顺序应用选项，后面的覆盖前面的
    pub fn with_options<I>(options: I) -> Self
    where
        I: IntoIterator<Item = TrackerOption>,
    {
        let mut tracker = Self::new();
        for option in options {
            tracker.apply(option);
        }
        tracker
    }

    pub fn builder() -> TrackerBuilder {
        TrackerBuilder::default()
    }

    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        let tracker = match config.sink {
            Sink::Stdout => Self::new(),
            // level 只对 log 输出有意义
            Sink::Log => Self::with_options([TrackerOption::Logger(log_facade(
                config.log_level()?,
                config.target.as_str(),
            ))]),
        };
        Ok(tracker)
    }

    fn apply(&mut self, option: TrackerOption) {
        match option {
            TrackerOption::Logger(log_fn) => self.log_fn = log_fn,
            TrackerOption::ContextEnhancer(enhancer) => self.context_enhancer = enhancer,
        }
    }

    pub fn log_fn(&self) -> &LogFn {
        &self.log_fn
    }

    pub fn context_enhancer(&self) -> &ContextEnhancer {
        &self.context_enhancer
    }

    /// 记录 `now - start` 的耗时，立即返回，不阻塞调用方。
    ///
    /// 传入 `logger` 时用它输出，否则用 tracker 配置的日志函数，context 为 enhancer 的结果。
    /// start 在未来时耗时为负数，原样输出。日志函数 panic 时改为输出一条 `Status=logError`。
    /// 并发调用之间的输出顺序不保证。
    pub fn track(&self, ctx: &Context, start: DateTime<Utc>, name: &str, logger: Option<LogFn>) {
        let logger = logger.unwrap_or_else(|| self.log_fn.clone());
        let duration = time::elapsed_since(start);
        let ctx = (self.context_enhancer)(ctx);
        dispatch(ctx, name, duration, logger);
    }

    /// 从现在开始计时，guard 释放时输出
    pub fn guard<S: Into<String>>(&self, ctx: &Context, name: S) -> TrackGuard<'_> {
        TrackGuard::new(self, ctx.clone(), name.into())
    }
}

fn dispatch(ctx: Context, name: &str, duration: TimeDelta, logger: LogFn) {
    let sink_ctx = ctx.clone();
    let sink_logger = logger.clone();
    let recovery_ctx = ctx.clone();
    let recovery_logger = logger.clone();
    let recovery_name = name.to_string();
    let name = name.to_string();

    SafeTask::new()
        .tag(name.as_str())
        .log_with(move |args| sink_logger(&sink_ctx, args))
        .on_panic(move |err| {
            recovery_logger(
                &recovery_ctx,
                format_args!(
                    "[Latency] Name={}, Duration={}, Status=logError, Error={}",
                    recovery_name,
                    time::format_duration(duration),
                    err
                ),
            )
        })
        .spawn(move || {
            logger(
                &ctx,
                format_args!(
                    "[Latency] Name={}, Duration={}, Status=completed",
                    name,
                    time::format_duration(duration)
                ),
            );
            Ok(())
        });
}

#[derive(Default)]
pub struct TrackerBuilder {
    options: Vec<TrackerOption>,
}

impl TrackerBuilder {
    pub fn logger<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context, fmt::Arguments<'_>) + Send + Sync + 'static,
    {
        self.options.push(with_logger(f));
        self
    }

    pub fn log_fn(mut self, log_fn: LogFn) -> Self {
        self.options.push(TrackerOption::Logger(log_fn));
        self
    }

    pub fn context_enhancer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context) -> Context + Send + Sync + 'static,
    {
        self.options.push(with_context_enhancer(f));
        self
    }

    pub fn enhancer(mut self, enhancer: ContextEnhancer) -> Self {
        self.options.push(TrackerOption::ContextEnhancer(enhancer));
        self
    }

    pub fn build(self) -> LatencyTracker {
        LatencyTracker::with_options(self.options)
    }
}
