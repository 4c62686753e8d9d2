pub mod error;
pub mod safe_task;
pub use error::{Result, TaskError};
pub use safe_task::{LogSink, RecoveryHandler, SafeTask};
