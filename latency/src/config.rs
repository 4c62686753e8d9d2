use crate::error::{LatencyError, Result};
use config::FileFormat;
use log::{Level, info};
use serde::{Deserialize, Serialize};

const TRACKER_SECTION: &str = "latency";

/// 配置文件加载，仅在调用方显式调用时读取文件；tracker 本身从不读文件或环境变量
pub struct Config {
    settings: config::Config,
}

impl Config {
    pub fn load(filepath: &str, format: FileFormat) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name(filepath).format(format))
            .build()
            .map(|settings| {
                info!("loaded latency settings from {}", filepath);
                Config { settings }
            })
            .map_err(|e| LatencyError::config(e.to_string()))
    }

    pub fn from_toml(filepath: &str) -> Result<Self> {
        Self::load(filepath, FileFormat::Toml)
    }

    pub fn from_json(filepath: &str) -> Result<Self> {
        Self::load(filepath, FileFormat::Json)
    }

    pub fn from_yaml(filepath: &str) -> Result<Self> {
        Self::load(filepath, FileFormat::Yaml)
    }

    pub fn get<'de, T: Deserialize<'de>>(&self, key: &str) -> Result<T> {
        self.settings
            .get::<T>(key)
            .map_err(|e| LatencyError::config(format!("{}: {}", key, e)))
    }
}

/// 默认日志函数的输出位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sink {
    #[default]
    Stdout,
    Log,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_target() -> String {
    "latency".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub sink: Sink,

    // 仅 sink = "log" 时生效
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_target")]
    pub target: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sink: Sink::default(),
            level: default_level(),
            target: default_target(),
        }
    }
}

impl TrackerConfig {
    /// 读取 `[latency]` 段
    pub fn from_config(config: &Config) -> Result<Self> {
        config.get::<TrackerConfig>(TRACKER_SECTION)
    }

    pub fn log_level(&self) -> Result<Level> {
        self.level
            .parse::<Level>()
            .map_err(|_| LatencyError::invalid_level(self.level.as_str()))
    }
}
