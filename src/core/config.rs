//! 配置管理模块
//!
//! 提供配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [batch]
//! initial_vertex_capacity = 4096   # 共享顶点缓冲区初始容量（顶点数）
//! initial_index_capacity = 12288   # 共享索引缓冲区初始容量（索引数）
//! frames = 3                       # 演示程序运行的帧数
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! log_file = "batch_render.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};

/// 配置根节点
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 批处理配置
    #[serde(default)]
    pub batch: BatchConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 批处理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// 共享顶点缓冲区初始容量（以顶点计）
    #[serde(default = "default_vertex_capacity")]
    pub initial_vertex_capacity: u32,

    /// 共享索引缓冲区初始容量（以索引计）
    #[serde(default = "default_index_capacity")]
    pub initial_index_capacity: u32,

    /// 演示程序运行的帧数
    #[serde(default = "default_frames")]
    pub frames: u32,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_vertex_capacity() -> u32 { 4096 }
fn default_index_capacity() -> u32 { 4096 * 3 }
fn default_frames() -> u32 { 3 }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "batch_render.log".to_string() }

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            initial_vertex_capacity: default_vertex_capacity(),
            initial_index_capacity: default_index_capacity(),
            frames: default_frames(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl LogLevel {
    /// 从命令行字符串解析日志级别
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--frames <value>`: 运行帧数
    /// - `--vertex-capacity <value>`: 顶点缓冲区初始容量
    /// - `--index-capacity <value>`: 索引缓冲区初始容量
    /// - `--log-level <value>`: 日志级别
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        let value_of = |flag: &str| -> Option<&String> {
            args.iter()
                .position(|a| a == flag)
                .and_then(|idx| args.get(idx + 1))
        };

        if let Some(frames) = value_of("--frames").and_then(|v| v.parse().ok()) {
            self.batch.frames = frames;
        }

        if let Some(capacity) = value_of("--vertex-capacity").and_then(|v| v.parse().ok()) {
            self.batch.initial_vertex_capacity = capacity;
        }

        if let Some(capacity) = value_of("--index-capacity").and_then(|v| v.parse().ok()) {
            self.batch.initial_index_capacity = capacity;
        }

        if let Some(level) = value_of("--log-level").and_then(|v| LogLevel::parse(v)) {
            self.logging.level = level;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.batch.frames == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch.frames".to_string(),
                reason: "Frame count must be greater than 0".to_string(),
            }.into());
        }

        // 共享缓冲区使用 16 位索引
        if self.batch.initial_vertex_capacity > u16::MAX as u32 + 1 {
            return Err(ConfigError::InvalidValue {
                field: "batch.initial_vertex_capacity".to_string(),
                reason: format!("Vertex capacity must not exceed {}", u16::MAX as u32 + 1),
            }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.batch.initial_vertex_capacity, 4096);
        assert_eq!(config.batch.initial_index_capacity, 12288);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.batch.frames = 0;
        assert!(config.validate().is_err());

        config.batch.frames = 1;
        config.batch.initial_vertex_capacity = 70_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str(
            r#"
            [batch]
            frames = 10

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.batch.frames, 10);
        assert_eq!(config.batch.initial_vertex_capacity, 4096);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml_str("[batch\nframes = ").is_err());
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args([
            "batch_render",
            "--frames",
            "7",
            "--vertex-capacity",
            "128",
            "--log-level",
            "TRACE",
        ]);

        assert_eq!(config.batch.frames, 7);
        assert_eq!(config.batch.initial_vertex_capacity, 128);
        assert_eq!(config.batch.initial_index_capacity, 12288);
        assert_eq!(config.logging.level, LogLevel::Trace);
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::from_file("does/not/exist.toml").is_err());
        let config = Config::from_file_or_default("does/not/exist.toml");
        assert_eq!(config.batch.frames, 3);
    }
}
