pub mod config;
pub mod context;
pub mod error;
pub mod global;
pub mod guard;
pub mod tracker;
pub use config::{Config, Sink, TrackerConfig};
pub use context::{Context, TRACE_ID_KEY};
pub use error::{LatencyError, Result};
pub use global::{default_tracker, guard, install_default, track};
pub use guard::TrackGuard;
pub use tracker::{
    ContextEnhancer, LatencyTracker, LogFn, TrackerBuilder, TrackerOption, context_enhancer,
    keep_context, log_facade, log_fn, stdout_log_fn, with_context_enhancer, with_logger,
    writer_log_fn,
};

#[cfg(test)]
mod global_test;
#[cfg(test)]
mod guard_test;
