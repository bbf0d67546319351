//! 渲染数据层
//!
//! 连接场景节点与共享几何缓冲区：每个可绘制节点挂一个 `RenderHandle`，
//! 每帧由 `RenderFlow` 遍历节点树，`ModelBatcher` 把各句柄的网格依次填进同一个 `MeshBuffer`。
//!
//! # 模块组织
//!
//! - `render_handle`：单个可绘制对象的渲染数据适配器
//! - `mesh_buffer`：按帧复用的共享顶点/索引缓冲区
//! - `model_batcher`：填充共享缓冲区并合并绘制批次
//! - `node_proxy`：渲染遍历使用的节点
//! - `render_flow`：每帧的节点树遍历
//! - `scene_builder`：从场景配置构建节点树

pub mod effect;
pub mod mesh_buffer;
pub mod render_handle;
pub mod model_batcher;
pub mod node_proxy;
pub mod render_flow;
pub mod scene_builder;

pub use effect::Effect;
pub use mesh_buffer::{MeshBuffer, MAX_VERTEX_COUNT};
pub use render_handle::{RenderData, RenderHandle, VertexMode};
pub use model_batcher::{Batch, ModelBatcher};
pub use node_proxy::NodeProxy;
pub use render_flow::{FrameStats, RenderFlow, SystemHandle};
pub use scene_builder::{build_scene, Scene};
