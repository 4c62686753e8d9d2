use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatencyError {
    #[error("default tracker already initialized")]
    AlreadyInitialized,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid log level: {level}")]
    InvalidLevel { level: String },
}

impl LatencyError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        LatencyError::Config {
            message: message.into(),
        }
    }

    pub fn invalid_level<S: Into<String>>(level: S) -> Self {
        LatencyError::InvalidLevel {
            level: level.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LatencyError>;
