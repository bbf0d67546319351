//! 错误处理模块
//!
//! 定义了渲染数据层使用的统一错误类型。
//!
//! # 错误分类
//!
//! - 可恢复错误：配置文件、场景文件、网格文件的加载失败，通过 `Result` 返回
//! - 越界访问：网格索引越界时静默忽略，不产生错误
//! - 数据格式错误：顶点字节数与顶点格式不匹配等，属于上游的编程错误，直接断言失败
//!
//! 只有第一类会出现在这里。

use std::fmt;
use std::path::PathBuf;

/// 统一的 Result 类型
pub type Result<T> = std::result::Result<T, BatchRenderError>;

/// batch_render 的错误类型
#[derive(Debug)]
pub enum BatchRenderError {
    /// 配置错误
    Config(ConfigError),

    /// 场景描述错误
    Scene(String),

    /// 网格加载错误
    MeshLoading(MeshLoadError),

    /// IO 错误
    Io(std::io::Error),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 网格加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),

    /// 数据验证失败
    ValidationError(String),

    /// 几何数据无效
    InvalidGeometry(String),
}

impl fmt::Display for BatchRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchRenderError::Config(e) => write!(f, "Configuration error: {}", e),
            BatchRenderError::Scene(msg) => write!(f, "Scene error: {}", msg),
            BatchRenderError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            BatchRenderError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => write!(f, "Mesh file not found: {}", path.display()),
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse mesh: {}", msg),
            MeshLoadError::ValidationError(msg) => write!(f, "Mesh validation failed: {}", msg),
            MeshLoadError::InvalidGeometry(msg) => write!(f, "Invalid geometry data: {}", msg),
        }
    }
}

impl std::error::Error for BatchRenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchRenderError::Io(e) => Some(e),
            BatchRenderError::Config(e) => Some(e),
            BatchRenderError::MeshLoading(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for MeshLoadError {}

impl From<std::io::Error> for BatchRenderError {
    fn from(err: std::io::Error) -> Self {
        BatchRenderError::Io(err)
    }
}

impl From<ConfigError> for BatchRenderError {
    fn from(err: ConfigError) -> Self {
        BatchRenderError::Config(err)
    }
}

impl From<MeshLoadError> for BatchRenderError {
    fn from(err: MeshLoadError) -> Self {
        BatchRenderError::MeshLoading(err)
    }
}
