//! 模型批处理器
//!
//! 把遍历中提交的渲染句柄依次填充进同一个共享缓冲区，
//! 相邻且效果相同的网格合并为一个绘制批次。

use std::rc::Rc;

use super::effect::Effect;
use super::mesh_buffer::{MeshBuffer, MAX_VERTEX_COUNT};
use super::node_proxy::NodeProxy;
use super::render_handle::RenderHandle;
use crate::{batch_trace, batch_warn};

/// 一个绘制批次：共享缓冲区中一段连续的索引
#[derive(Debug, Clone)]
pub struct Batch {
    /// 批次使用的效果
    pub effect: Rc<Effect>,

    /// 起始索引位置
    pub index_start: u32,

    /// 索引数量
    pub index_count: u32,
}

/// 模型批处理器
#[derive(Debug)]
pub struct ModelBatcher {
    buffer: MeshBuffer,
    batches: Vec<Batch>,
}

impl ModelBatcher {
    /// 使用给定的共享缓冲区创建批处理器
    pub fn new(buffer: MeshBuffer) -> Self {
        Self {
            buffer,
            batches: Vec::new(),
        }
    }

    /// 开始新的一帧
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.batches.clear();
    }

    /// 提交一个节点的渲染句柄
    ///
    /// 按网格顺序填充共享缓冲区。没有效果（未绑定或已销毁）的网格跳过；
    /// 共享缓冲区放不下（顶点总数超出 16 位索引范围）的网格本帧也跳过。
    pub fn commit(&mut self, node: &NodeProxy, handle: &mut RenderHandle) {
        let world_mat = *node.world_matrix();

        for index in 0..handle.mesh_count() {
            let Some(effect) = handle.effect(index) else {
                batch_trace!(node = node.name(), index, "Mesh skipped: no effect");
                continue;
            };

            let bytes = handle.render_data(index).map_or(0, |data| data.vertex_bytes().len());
            let vertex_count = (bytes / self.buffer.vertex_format().stride() as usize) as u32;
            if self.buffer.vertex_offset() + vertex_count > MAX_VERTEX_COUNT {
                batch_warn!(
                    node = node.name(),
                    index,
                    vertex_count,
                    vertex_offset = self.buffer.vertex_offset(),
                    "Mesh skipped: shared buffer exceeds the 16-bit index range"
                );
                continue;
            }

            let index_start = self.buffer.index_offset();
            handle.fill_buffers(&mut self.buffer, index, &world_mat);
            let index_count = self.buffer.index_offset() - index_start;
            if index_count == 0 {
                continue;
            }

            let merged = match self.batches.last_mut() {
                Some(last)
                    if Rc::ptr_eq(&last.effect, &effect)
                        && last.index_start + last.index_count == index_start =>
                {
                    last.index_count += index_count;
                    true
                }
                _ => false,
            };

            if !merged {
                self.batches.push(Batch {
                    effect,
                    index_start,
                    index_count,
                });
            }
        }
    }

    /// 本帧的绘制批次
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// 共享缓冲区
    pub fn buffer(&self) -> &MeshBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::Transform;
    use crate::geometry::{primitives, MeshData, Vertex, VertexFormat};
    use crate::math::Matrix4;

    fn quad_handle(vfmt: &Rc<VertexFormat>, effects: &[&Rc<Effect>]) -> RenderHandle {
        let mut handle = RenderHandle::new(Rc::clone(vfmt));
        handle.set_mesh_count(effects.len());
        for (i, effect) in effects.iter().enumerate() {
            let (vertices, indices) = primitives::quad(1.0, 1.0).to_typed_arrays();
            handle.update_native_mesh(i, vertices, indices);
            handle.update_native_effect(i, effect);
        }
        handle
    }

    #[test]
    fn test_merges_same_effect() {
        let vfmt = Rc::new(Vertex::format());
        let sprite = Rc::new(Effect::new("sprite"));
        let unlit = Rc::new(Effect::new("unlit"));
        let mut batcher = ModelBatcher::new(MeshBuffer::new(Rc::clone(&vfmt), 4, 6));

        let mut node = NodeProxy::with_transform("n", Transform::from_position(1.0, 0.0, 0.0));
        node.update_world_matrix(&Matrix4::identity());
        let mut handle = quad_handle(&vfmt, &[&sprite, &sprite, &unlit]);

        batcher.commit(&node, &mut handle);

        let batches = batcher.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!((batches[0].index_start, batches[0].index_count), (0, 12));
        assert!(Rc::ptr_eq(&batches[0].effect, &sprite));
        assert_eq!((batches[1].index_start, batches[1].index_count), (12, 6));
        assert_eq!(batcher.buffer().vertex_offset(), 12);
        assert_eq!(&batcher.buffer().indices()[6..12], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_skips_mesh_without_effect() {
        let vfmt = Rc::new(Vertex::format());
        let sprite = Rc::new(Effect::new("sprite"));
        let mut batcher = ModelBatcher::new(MeshBuffer::new(Rc::clone(&vfmt), 4, 6));
        let node = NodeProxy::new("n");

        let mut handle = quad_handle(&vfmt, &[&sprite]);
        handle.set_mesh_count(2);
        let (vertices, indices) = primitives::triangle().to_typed_arrays();
        handle.update_native_mesh(1, vertices, indices);

        batcher.commit(&node, &mut handle);
        assert_eq!(batcher.buffer().vertex_offset(), 4);
        assert_eq!(batcher.batches().len(), 1);

        batcher.reset();
        assert!(batcher.batches().is_empty());
        assert_eq!(batcher.buffer().index_offset(), 0);
    }

    #[test]
    fn test_skips_mesh_past_index_range() {
        let vfmt = Rc::new(Vertex::format());
        let sprite = Rc::new(Effect::new("sprite"));
        let mut batcher = ModelBatcher::new(MeshBuffer::new(Rc::clone(&vfmt), 4, 6));
        let node = NodeProxy::new("n");

        let mut mesh = MeshData::with_name("Large");
        mesh.vertices = vec![Vertex::default(); 40_000];
        mesh.indices = vec![0, 1, 2];
        assert!(mesh.validate().is_ok());

        let mut handle = RenderHandle::new(Rc::clone(&vfmt));
        handle.set_mesh_count(3);
        for i in 0..2 {
            let (vertices, indices) = mesh.to_typed_arrays();
            handle.update_native_mesh(i, vertices, indices);
            handle.update_native_effect(i, &sprite);
        }
        let (vertices, indices) = primitives::triangle().to_typed_arrays();
        handle.update_native_mesh(2, vertices, indices);
        handle.update_native_effect(2, &sprite);

        // 第二个大网格放不下，后面的小网格仍然能填充
        batcher.commit(&node, &mut handle);
        assert_eq!(batcher.buffer().vertex_offset(), 40_003);
        assert_eq!(batcher.buffer().index_offset(), 6);
        assert_eq!(batcher.batches().len(), 1);
        assert_eq!(batcher.batches()[0].index_count, 6);
        assert_eq!(&batcher.buffer().indices()[3..], &[40_000, 40_001, 40_002]);
    }
}
