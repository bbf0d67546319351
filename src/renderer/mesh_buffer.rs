//! 共享顶点/索引暂存缓冲区
//!
//! 一帧内多个渲染句柄依次向同一个 `MeshBuffer` 追加数据。分配协议：
//!
//! 1. 读取当前的 `byte_offset()`、`index_offset()`、`vertex_offset()`
//! 2. 调用 `request(vertex_count, index_count)` 推进游标，必要时扩容
//! 3. 重新获取存储切片，在第 1 步得到的偏移处写入数据
//!
//! `request` 可能重新分配存储，任何在它之前取得的切片都不能再使用；
//! 偏移本身不受扩容影响，所以先取偏移、后申请、再写入，每个句柄的区域在申请后就固定了。

use std::rc::Rc;

use crate::core::config::BatchConfig;
use crate::geometry::VertexFormat;

/// 16 位索引能寻址的最大顶点数
pub const MAX_VERTEX_COUNT: u32 = u16::MAX as u32 + 1;

/// 共享顶点/索引暂存缓冲区
#[derive(Debug)]
pub struct MeshBuffer {
    vfmt: Rc<VertexFormat>,
    v_data: Vec<u8>,
    i_data: Vec<u16>,
    byte_offset: u32,
    vertex_offset: u32,
    index_offset: u32,
}

impl MeshBuffer {
    /// 创建缓冲区
    ///
    /// # 参数
    ///
    /// * `vfmt` - 顶点格式，决定每个顶点的字节数
    /// * `vertex_capacity` - 初始顶点容量
    /// * `index_capacity` - 初始索引容量
    pub fn new(vfmt: Rc<VertexFormat>, vertex_capacity: u32, index_capacity: u32) -> Self {
        assert!(vfmt.stride() > 0, "MeshBuffer::new vertex format has zero stride");

        let stride = vfmt.stride() as usize;
        Self {
            v_data: vec![0; vertex_capacity as usize * stride],
            i_data: vec![0; index_capacity as usize],
            vfmt,
            byte_offset: 0,
            vertex_offset: 0,
            index_offset: 0,
        }
    }

    /// 按批处理配置创建缓冲区
    pub fn from_config(vfmt: Rc<VertexFormat>, config: &BatchConfig) -> Self {
        Self::new(vfmt, config.initial_vertex_capacity, config.initial_index_capacity)
    }

    /// 顶点格式
    #[inline]
    pub fn vertex_format(&self) -> &Rc<VertexFormat> {
        &self.vfmt
    }

    /// 下一次顶点写入的字节偏移
    #[inline]
    pub fn byte_offset(&self) -> u32 {
        self.byte_offset
    }

    /// 下一次顶点写入的顶点序号，同时也是新索引的基准值
    #[inline]
    pub fn vertex_offset(&self) -> u32 {
        self.vertex_offset
    }

    /// 下一次索引写入的位置
    #[inline]
    pub fn index_offset(&self) -> u32 {
        self.index_offset
    }

    /// 当前顶点容量（以顶点计）
    pub fn vertex_capacity(&self) -> u32 {
        (self.v_data.len() / self.vfmt.stride() as usize) as u32
    }

    /// 当前索引容量
    pub fn index_capacity(&self) -> u32 {
        self.i_data.len() as u32
    }

    /// 申请 `vertex_count` 个顶点和 `index_count` 个索引
    ///
    /// 推进游标，容量不足时按两倍扩容。调用者必须在调用之前读取偏移。
    ///
    /// # Panics
    ///
    /// 顶点总数超出 16 位索引范围时 panic。
    pub fn request(&mut self, vertex_count: u32, index_count: u32) {
        let vertex_offset = self.vertex_offset + vertex_count;
        assert!(
            vertex_offset <= MAX_VERTEX_COUNT,
            "MeshBuffer::request vertex count {} exceeds the 16-bit index range",
            vertex_offset
        );
        let index_offset = self.index_offset + index_count;
        let byte_offset = vertex_offset * self.vfmt.stride();

        if byte_offset as usize > self.v_data.len() {
            let new_len = (byte_offset as usize).max(self.v_data.len() * 2);
            crate::batch_debug!(
                from = self.v_data.len(),
                to = new_len,
                "Growing shared vertex storage"
            );
            self.v_data.resize(new_len, 0);
        }

        if index_offset as usize > self.i_data.len() {
            let new_len = (index_offset as usize).max(self.i_data.len() * 2);
            crate::batch_debug!(
                from = self.i_data.len(),
                to = new_len,
                "Growing shared index storage"
            );
            self.i_data.resize(new_len, 0);
        }

        self.vertex_offset = vertex_offset;
        self.index_offset = index_offset;
        self.byte_offset = byte_offset;
    }

    /// 回到缓冲区起点，开始新的一帧；存储不释放
    pub fn reset(&mut self) {
        self.byte_offset = 0;
        self.vertex_offset = 0;
        self.index_offset = 0;
    }

    /// 整个顶点存储（可写）
    #[inline]
    pub fn vertex_data_mut(&mut self) -> &mut [u8] {
        &mut self.v_data
    }

    /// 整个索引存储（可写）
    #[inline]
    pub fn index_data_mut(&mut self) -> &mut [u16] {
        &mut self.i_data
    }

    /// 本帧已申请的顶点字节
    pub fn vertex_bytes(&self) -> &[u8] {
        &self.v_data[..self.byte_offset as usize]
    }

    /// 本帧已申请的索引
    pub fn indices(&self) -> &[u16] {
        &self.i_data[..self.index_offset as usize]
    }
}
