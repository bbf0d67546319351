//! batch_render - 批处理渲染数据层
//!
//! 为场景中每个可绘制对象维护渲染数据（顶点、索引、效果），
//! 每帧把它们变换到世界空间并追加进共享的几何缓冲区。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、场景描述、错误处理）
//! - `math`: 数学类型与矩阵工具
//! - `script`: 脚本侧类型化数组及其保活句柄
//! - `geometry`: 顶点格式、网格数据与 OBJ 加载器
//! - `renderer`: 渲染句柄、共享缓冲区、批处理与遍历
//!
//! # 使用示例
//!
//! ```
//! use std::rc::Rc;
//! use batch_render::core::{BatchConfig, SceneConfig};
//! use batch_render::geometry::Vertex;
//! use batch_render::renderer::{build_scene, RenderFlow};
//!
//! let vfmt = Rc::new(Vertex::format());
//! let mut scene = build_scene(&SceneConfig::default(), Rc::clone(&vfmt)).unwrap();
//! let mut flow = RenderFlow::from_config(&BatchConfig::default(), vfmt);
//!
//! let stats = flow.render(&mut scene.root);
//! assert_eq!(stats.batches, 3);
//! ```

pub mod core;
pub mod math;
pub mod script;
pub mod geometry;
pub mod renderer;
