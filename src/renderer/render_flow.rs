//! 渲染流程
//!
//! 每帧深度优先遍历节点树：计算世界矩阵，把启用的渲染句柄交给批处理器。

use std::rc::Rc;

use super::mesh_buffer::MeshBuffer;
use super::model_batcher::ModelBatcher;
use super::node_proxy::NodeProxy;
use super::render_handle::RenderHandle;
use crate::core::config::BatchConfig;
use crate::geometry::VertexFormat;
use crate::math::Matrix4;
use crate::span_trace;

/// 遍历回调
///
/// `handle` 在访问节点时调用，`post_handle` 在节点的全部子节点处理完之后调用。
/// 调用期间句柄已从节点上取出，`node.render_handle()` 返回 `None`。
pub trait SystemHandle {
    /// 访问节点
    fn handle(&mut self, node: &NodeProxy, flow: &mut RenderFlow);

    /// 子节点处理完毕
    fn post_handle(&mut self, _node: &NodeProxy, _flow: &mut RenderFlow) {}
}

impl SystemHandle for RenderHandle {
    fn handle(&mut self, node: &NodeProxy, flow: &mut RenderFlow) {
        flow.model_batcher_mut().commit(node, self);
    }
}

/// 单帧统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// 访问的节点数
    pub nodes: u32,
    /// 绘制批次数
    pub batches: u32,
    /// 写入共享缓冲区的顶点数
    pub vertices: u32,
    /// 写入共享缓冲区的索引数
    pub indices: u32,
}

/// 渲染流程
#[derive(Debug)]
pub struct RenderFlow {
    batcher: ModelBatcher,
}

impl RenderFlow {
    /// 使用给定的批处理器创建
    pub fn new(batcher: ModelBatcher) -> Self {
        Self { batcher }
    }

    /// 按批处理配置创建，共享缓冲区使用 `vfmt`
    pub fn from_config(config: &BatchConfig, vfmt: Rc<VertexFormat>) -> Self {
        Self::new(ModelBatcher::new(MeshBuffer::from_config(vfmt, config)))
    }

    /// 批处理器
    pub fn model_batcher(&self) -> &ModelBatcher {
        &self.batcher
    }

    /// 可修改的批处理器
    pub fn model_batcher_mut(&mut self) -> &mut ModelBatcher {
        &mut self.batcher
    }

    /// 渲染一帧
    ///
    /// 重置批处理器后遍历以 `root` 为根的节点树。
    pub fn render(&mut self, root: &mut NodeProxy) -> FrameStats {
        let _span = span_trace!("render_flow").entered();

        self.batcher.reset();
        let mut nodes = 0;
        self.visit(root, &Matrix4::identity(), &mut nodes);

        let buffer = self.batcher.buffer();
        FrameStats {
            nodes,
            batches: self.batcher.batches().len() as u32,
            vertices: buffer.vertex_offset(),
            indices: buffer.index_offset(),
        }
    }

    fn visit(&mut self, node: &mut NodeProxy, parent: &Matrix4, nodes: &mut u32) {
        node.update_world_matrix(parent);
        *nodes += 1;

        let mut handle = node.take_render_handle();
        let active = handle.as_ref().is_some_and(RenderHandle::is_enabled);

        if active {
            if let Some(handle) = handle.as_mut() {
                handle.handle(node, self);
            }
        }

        let world_mat = *node.world_matrix();
        for child in node.children_mut() {
            self.visit(child, &world_mat, nodes);
        }

        if active {
            if let Some(handle) = handle.as_mut() {
                handle.post_handle(node, self);
            }
        }

        node.restore_render_handle(handle);
    }
}
