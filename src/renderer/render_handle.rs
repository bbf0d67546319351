//! 渲染句柄
//!
//! 每个可绘制节点持有一个 `RenderHandle`，其中包含若干个网格（`RenderData`）。
//! 句柄负责：
//!
//! - 持有脚本层传入的顶点/索引类型化数组，并在替换或销毁时释放它们
//! - 保存每个网格绑定的效果（非拥有引用）
//! - 按世界矩阵计算世界空间顶点，并缓存结果
//! - 按 `MeshBuffer` 的分配协议把数据追加进共享缓冲区，同时重映射索引
//!
//! # 世界空间缓存
//!
//! 脏标记是整个句柄共享的，不区分网格：任意网格重新绑定顶点都会让下一次填充
//! 重建缓存（先整体拷贝原始顶点，再逐顶点覆盖位置分量）。此外，某个网格缓存的
//! 长度与原始顶点长度不一致时，无论脏标记如何都会重建。

use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use super::effect::Effect;
use super::mesh_buffer::MeshBuffer;
use crate::geometry::vertex_format::{AttribType, VertexFormat, ATTRIB_NAME_POSITION};
use crate::math::{transform_point, Matrix4, Vector3};
use crate::script::{Rooted, ScriptObject, TypedArray};
use crate::{batch_debug, batch_trace};

/// 顶点处理方式
///
/// 每个句柄选择一种，而不是每次填充时选择。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexMode {
    /// 顶点位于模型空间，填充时按世界矩阵变换
    #[default]
    Transformed,
    /// 顶点已经位于共享坐标空间（蒙皮、实例化等），原样拷贝
    PassThrough,
}

/// 绑定在网格上的脚本缓冲区
///
/// 字节视图每次都从保活句柄重新取得，不会比句柄活得更久。
#[derive(Debug)]
struct BoundBuffer {
    array: Rooted<TypedArray>,
}

impl BoundBuffer {
    fn new(array: Rc<TypedArray>) -> Self {
        Self {
            array: Rooted::new(array),
        }
    }
}

fn bytes_of(buffer: &Option<BoundBuffer>) -> &[u8] {
    match buffer {
        Some(b) => b.array.typed_array_data(),
        None => &[],
    }
}

#[inline]
fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    bytemuck::pod_read_unaligned(&bytes[offset..offset + 4])
}

#[inline]
fn write_f32(bytes: &mut [u8], offset: usize, value: f32) {
    bytes[offset..offset + 4].copy_from_slice(bytemuck::bytes_of(&value));
}

/// 单个网格的渲染数据
#[derive(Debug, Default)]
pub struct RenderData {
    vertices: Option<BoundBuffer>,
    indices: Option<BoundBuffer>,
    world_verts: Vec<u8>,
    effect: Option<Weak<Effect>>,
}

impl RenderData {
    /// 是否已经绑定了网格数据
    pub fn is_bound(&self) -> bool {
        self.vertices.is_some()
    }

    /// 原始（模型空间）顶点字节
    pub fn vertex_bytes(&self) -> &[u8] {
        bytes_of(&self.vertices)
    }

    /// 原始 16 位索引字节
    pub fn index_bytes(&self) -> &[u8] {
        bytes_of(&self.indices)
    }

    /// 最近一次计算的世界空间顶点
    pub fn world_verts(&self) -> &[u8] {
        &self.world_verts
    }

    /// 当前绑定的顶点数组
    pub fn vertex_array(&self) -> Option<&Rc<TypedArray>> {
        self.vertices.as_ref().map(|b| b.array.object())
    }

    /// 当前绑定的效果，未绑定或已销毁时为 `None`
    pub fn effect(&self) -> Option<Rc<Effect>> {
        self.effect.as_ref().and_then(Weak::upgrade)
    }
}

/// 渲染句柄
///
/// # 示例
///
/// ```
/// use std::rc::Rc;
/// use batch_render::geometry::{primitives, Vertex};
/// use batch_render::math::matrix;
/// use batch_render::renderer::{Effect, MeshBuffer, RenderHandle};
///
/// let vfmt = Rc::new(Vertex::format());
/// let effect = Rc::new(Effect::new("sprite"));
///
/// let mut handle = RenderHandle::new(Rc::clone(&vfmt));
/// handle.set_mesh_count(1);
/// let (vertices, indices) = primitives::quad(1.0, 1.0).to_typed_arrays();
/// handle.update_native_mesh(0, vertices, indices);
/// handle.update_native_effect(0, &effect);
///
/// let mut buffer = MeshBuffer::new(vfmt, 64, 64);
/// handle.fill_buffers(&mut buffer, 0, &matrix::translation(0.0, 5.0, 0.0));
/// assert_eq!(buffer.vertex_offset(), 4);
/// assert_eq!(buffer.indices(), &[0, 1, 2, 0, 2, 3]);
/// ```
#[derive(Debug)]
pub struct RenderHandle {
    datas: Vec<RenderData>,
    enabled: bool,
    verts_dirty: bool,
    vertex_mode: VertexMode,
    vfmt: Rc<VertexFormat>,
    cache_rebuilds: u64,
}

impl RenderHandle {
    /// 创建句柄，所有网格共享 `vfmt`
    ///
    /// 新句柄处于禁用状态，没有任何网格。
    pub fn new(vfmt: Rc<VertexFormat>) -> Self {
        Self {
            datas: Vec::new(),
            enabled: false,
            verts_dirty: true,
            vertex_mode: VertexMode::default(),
            vfmt,
            cache_rebuilds: 0,
        }
    }

    /// 启用（幂等）
    pub fn enable(&mut self) {
        if !self.enabled {
            self.enabled = true;
        }
    }

    /// 禁用（幂等），不清除缓冲区和效果
    pub fn disable(&mut self) {
        if self.enabled {
            self.enabled = false;
        }
    }

    /// 是否参与遍历
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 顶点格式
    pub fn vertex_format(&self) -> &Rc<VertexFormat> {
        &self.vfmt
    }

    /// 替换顶点格式，世界空间缓存随之失效
    pub fn set_vertex_format(&mut self, vfmt: Rc<VertexFormat>) {
        self.vfmt = vfmt;
        self.verts_dirty = true;
    }

    /// 顶点处理方式
    pub fn vertex_mode(&self) -> VertexMode {
        self.vertex_mode
    }

    /// 设置顶点处理方式
    pub fn set_vertex_mode(&mut self, mode: VertexMode) {
        self.vertex_mode = mode;
    }

    /// 设置网格数量
    ///
    /// 保留前 `min(旧数量, count)` 个网格，新增的网格处于未绑定状态，
    /// 被截掉的网格释放它们持有的脚本缓冲区。
    pub fn set_mesh_count(&mut self, count: usize) {
        self.datas.resize_with(count, RenderData::default);
    }

    /// 网格数量
    #[inline]
    pub fn mesh_count(&self) -> usize {
        self.datas.len()
    }

    /// 第 `index` 个网格的数据
    pub fn render_data(&self, index: usize) -> Option<&RenderData> {
        self.datas.get(index)
    }

    /// 世界空间缓存是否待重建
    pub fn is_dirty(&self) -> bool {
        self.verts_dirty
    }

    /// 世界空间缓存累计重建次数
    pub fn cache_rebuilds(&self) -> u64 {
        self.cache_rebuilds
    }

    /// 绑定脚本层传入的网格数据
    ///
    /// 索引越界时什么也不做。否则先释放旧的顶点/索引数组，再 root 新数组，
    /// 并把世界空间缓存标记为失效。
    pub fn update_native_mesh(
        &mut self,
        index: usize,
        vertices: Rc<TypedArray>,
        indices: Rc<TypedArray>,
    ) {
        let Some(data) = self.datas.get_mut(index) else {
            batch_trace!(index, count = self.datas.len(), "update_native_mesh ignored: index out of range");
            return;
        };

        data.vertices = None;
        data.indices = None;

        data.vertices = Some(BoundBuffer::new(vertices));
        data.indices = Some(BoundBuffer::new(indices));
        self.verts_dirty = true;

        batch_debug!(
            index,
            vertex_bytes = data.vertex_bytes().len(),
            index_bytes = data.index_bytes().len(),
            "Native mesh updated"
        );
    }

    /// 绑定效果（非拥有引用）
    ///
    /// 索引越界时什么也不做。
    pub fn update_native_effect(&mut self, index: usize, effect: &Rc<Effect>) {
        match self.datas.get_mut(index) {
            Some(data) => data.effect = Some(Rc::downgrade(effect)),
            None => {
                batch_trace!(index, count = self.datas.len(), "update_native_effect ignored: index out of range");
            }
        }
    }

    /// 第 `index` 个网格的效果
    ///
    /// 索引越界、从未绑定或效果已被销毁时返回 `None`。
    pub fn effect(&self, index: usize) -> Option<Rc<Effect>> {
        self.datas.get(index).and_then(RenderData::effect)
    }

    /// 把第 `index` 个网格追加进共享缓冲区
    ///
    /// 索引越界时什么也不做。顶点按当前的 [`VertexMode`] 变换或原样拷贝，
    /// 索引加上调用时缓冲区的顶点游标后写入。
    ///
    /// # Panics
    ///
    /// - 顶点字节数不是顶点格式步长的整数倍
    /// - 索引字节数不是 2 的整数倍
    /// - 缓冲区的顶点步长与句柄不一致
    /// - 需要变换时，顶点格式缺少 2 或 3 分量的浮点位置属性
    pub fn fill_buffers(&mut self, buffer: &mut MeshBuffer, index: usize, world_mat: &Matrix4) {
        let Some(data) = self.datas.get_mut(index) else {
            batch_trace!(index, count = self.datas.len(), "fill_buffers ignored: index out of range");
            return;
        };

        let bytes_per_vertex = self.vfmt.stride() as usize;
        assert_eq!(
            buffer.vertex_format().stride() as usize,
            bytes_per_vertex,
            "RenderHandle::fill_buffers buffer stride doesn't match vertex format"
        );

        let v_bytes = bytes_of(&data.vertices).len();
        let i_bytes = bytes_of(&data.indices).len();
        assert!(
            v_bytes % bytes_per_vertex == 0,
            "RenderHandle::fill_buffers vertices data doesn't follow vertex format"
        );
        assert!(
            i_bytes % 2 == 0,
            "RenderHandle::fill_buffers indices data is not saved in 16bit"
        );
        let vertex_count = v_bytes / bytes_per_vertex;
        let index_count = i_bytes / 2;

        // 必须在 request 之前读取偏移
        let v_buffer_offset = buffer.byte_offset() as usize;
        let i_data_id = buffer.index_offset() as usize;
        let vertex_id = buffer.vertex_offset();
        buffer.request(vertex_count as u32, index_count as u32);

        let vertices = bytes_of(&data.vertices);
        match self.vertex_mode {
            VertexMode::Transformed => {
                if self.verts_dirty || data.world_verts.len() != v_bytes {
                    data.world_verts.clear();
                    data.world_verts.extend_from_slice(vertices);
                    self.verts_dirty = false;
                    self.cache_rebuilds += 1;
                }

                if vertex_count > 0 {
                    let pos_desc = match self.vfmt.element(ATTRIB_NAME_POSITION) {
                        Some(desc) if desc.ty == AttribType::Float32 && matches!(desc.num, 2 | 3) => desc,
                        _ => panic!("RenderHandle::fill_buffers vertex format has no 2D/3D float position"),
                    };
                    let num = pos_desc.num as usize;
                    let el_offset = pos_desc.offset as usize;

                    for i in 0..vertex_count {
                        let offset = i * bytes_per_vertex + el_offset;
                        let mut pos = Vector3::zeros();
                        for c in 0..num {
                            pos[c] = read_f32(vertices, offset + c * 4);
                        }
                        let world = transform_point(world_mat, &pos);
                        for c in 0..num {
                            write_f32(&mut data.world_verts, offset + c * 4, world[c]);
                        }
                    }
                }

                buffer.vertex_data_mut()[v_buffer_offset..v_buffer_offset + v_bytes]
                    .copy_from_slice(&data.world_verts);
            }
            VertexMode::PassThrough => {
                buffer.vertex_data_mut()[v_buffer_offset..v_buffer_offset + v_bytes]
                    .copy_from_slice(vertices);
            }
        }

        // 索引加上顶点游标
        let indices = bytes_of(&data.indices);
        let i_data = &mut buffer.index_data_mut()[i_data_id..i_data_id + index_count];
        for (dst, raw) in i_data.iter_mut().zip(indices.chunks_exact(2)) {
            let raw: u16 = bytemuck::pod_read_unaligned(raw);
            debug_assert!(
                (raw as usize) < vertex_count,
                "RenderHandle::fill_buffers index {} out of range for {} vertices",
                raw,
                vertex_count
            );
            *dst = (vertex_id + raw as u32) as u16;
        }

        batch_trace!(index, vertex_count, index_count, vertex_id, "Mesh filled");
    }
}
