use crate::error::{Result, TaskError};
use log::{debug, error};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, SendError, Sender, channel};
use std::sync::{Arc, Mutex, OnceLock};

const DEFAULT_TAG: &str = "safe_task";
const WORKER_THREAD_NAME: &str = "safe-spawn";
const MIN_POOL_SIZE: usize = 2;

/// 任务自身诊断信息的输出（任务返回错误、panic 未被处理等）
pub type LogSink = Arc<dyn Fn(fmt::Arguments<'_>) + Send + Sync>;

/// 工作函数 panic 时调用，参数为 `TaskError::Panicked`
pub type RecoveryHandler = Box<dyn FnOnce(TaskError) + Send>;

type Job = Box<dyn FnOnce() + Send>;

// 进程级 worker 池，首次 spawn 时启动，不依赖调用方的 tokio runtime
static POOL: OnceLock<Option<Sender<Job>>> = OnceLock::new();

/// 异步执行工作函数，调用方不等待结果。
///
/// 工作函数在 safe_spawn 自己的 worker 线程上执行，调用方 runtime 关闭也不会丢任务。
/// panic 不会越过任务边界：转换为 `TaskError::Panicked` 交给 recovery handler。
/// 不返回任何句柄，任务之间没有顺序、完成或取消的保证。
#[derive(Default)]
pub struct SafeTask {
    tag: Option<String>,
    log: Option<LogSink>,
    recovery: Option<RecoveryHandler>,
}

impl SafeTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn log_with<F>(mut self, sink: F) -> Self
    where
        F: Fn(fmt::Arguments<'_>) + Send + Sync + 'static,
    {
        self.log = Some(Arc::new(sink));
        self
    }

    pub fn on_panic<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(TaskError) + Send + 'static,
    {
        self.recovery = Some(Box::new(handler));
        self
    }

    pub fn spawn<F>(self, work: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let tag = self.tag.unwrap_or_else(|| DEFAULT_TAG.to_string());
        let log = self.log;
        let worker = Worker {
            tag: tag.clone(),
            log: log.clone(),
            recovery: self.recovery,
        };
        let job: Job = Box::new(move || worker.run(work));

        debug!("[{}] dispatching to worker pool", tag);
        let job = match pool() {
            Some(sender) => match sender.send(job) {
                Ok(()) => return,
                Err(SendError(job)) => job,
            },
            None => job,
        };

        // 池不可用时退化为独立线程
        if let Err(e) = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(job)
        {
            let err = TaskError::from(e);
            emit(log.as_ref(), format_args!("[{}] {}", tag, err));
        }
    }
}

fn pool() -> Option<&'static Sender<Job>> {
    POOL.get_or_init(start_pool).as_ref()
}

fn start_pool() -> Option<Sender<Job>> {
    let size = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(MIN_POOL_SIZE)
        .max(MIN_POOL_SIZE);
    let (tx, rx) = channel::<Job>();
    let rx = Arc::new(Mutex::new(rx));

    let mut started = 0;
    for _ in 0..size {
        let rx = rx.clone();
        match std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker_loop(rx))
        {
            Ok(_) => started += 1,
            Err(e) => error!("failed to start safe-spawn worker: {}", e),
        }
    }
    if started == 0 {
        return None;
    }
    debug!("safe-spawn pool started with {} workers", started);
    Some(tx)
}

fn worker_loop(rx: Arc<Mutex<Receiver<Job>>>) {
    loop {
        let job = {
            let rx = match rx.lock() {
                Ok(rx) => rx,
                Err(poisoned) => poisoned.into_inner(),
            };
            rx.recv()
        };
        match job {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
}

struct Worker {
    tag: String,
    log: Option<LogSink>,
    recovery: Option<RecoveryHandler>,
}

impl Worker {
    fn run<F>(self, work: F)
    where
        F: FnOnce() -> Result<()>,
    {
        let Worker { tag, log, recovery } = self;
        match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => emit(log.as_ref(), format_args!("[{}] task failed: {}", tag, e)),
            Err(payload) => {
                let err = TaskError::panicked(panic_message(payload.as_ref()));
                match recovery {
                    Some(handler) => {
                        if let Err(payload) =
                            panic::catch_unwind(AssertUnwindSafe(move || handler(err)))
                        {
                            error!(
                                "[{}] recovery handler panicked: {}",
                                tag,
                                panic_message(payload.as_ref())
                            );
                        }
                    }
                    None => emit(log.as_ref(), format_args!("[{}] task panicked: {}", tag, err)),
                }
            }
        }
    }
}

fn emit(log: Option<&LogSink>, args: fmt::Arguments<'_>) {
    match log {
        Some(sink) => {
            if panic::catch_unwind(AssertUnwindSafe(|| sink(args))).is_err() {
                error!("log sink panicked while reporting: {}", args);
            }
        }
        None => error!("{}", args),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
