//! 核心功能模块
//!
//! 本模块提供渲染数据层的基础设施：日志系统、配置管理、场景描述和错误处理。
//!
//! # 模块组织
//!
//! - `log`：日志系统，基于 tracing 的结构化日志
//! - `config`：配置管理，支持从配置文件和命令行加载设置
//! - `scene`：场景描述，节点树及其网格和效果
//! - `error`：错误处理，定义统一的错误类型

pub mod log;
pub mod config;
pub mod scene;
pub mod error;

// 重新导出常用类型，方便使用
pub use error::{BatchRenderError, ConfigError, MeshLoadError, Result};
pub use config::{BatchConfig, Config, LogLevel, LoggingConfig};
pub use scene::{MeshConfig, MeshSource, NodeConfig, SceneConfig, Transform};
