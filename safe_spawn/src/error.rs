use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{message}")]
    Failed { message: String },

    #[error("{message}")]
    Panicked { message: String },

    #[error("failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),
}

impl TaskError {
    /// 工作函数主动返回的错误
    pub fn failed<S: Into<String>>(message: S) -> Self {
        TaskError::Failed {
            message: message.into(),
        }
    }

    /// 工作函数 panic 后恢复得到的错误，message 为 panic 内容
    pub fn panicked<S: Into<String>>(message: S) -> Self {
        TaskError::Panicked {
            message: message.into(),
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, TaskError::Panicked { .. })
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
