/// 网格顶点定义模块
///
/// 定义用于 3D 模型的完整顶点结构，包含位置、法线、UV坐标和切线向量，
/// 以及与之对应的 [`VertexFormat`]。

use bytemuck::{Pod, Zeroable};

use super::vertex_format::{
    AttribType, VertexFormat, ATTRIB_NAME_NORMAL, ATTRIB_NAME_POSITION, ATTRIB_NAME_TANGENT,
    ATTRIB_NAME_UV0,
};

/// 完整的3D顶点结构
///
/// 使用 `#[repr(C)]` 保证字段顺序，可以直接按字节写入脚本层的类型化数组。
///
/// # 内存布局
///
/// - position: 12 bytes (3 * f32)
/// - normal: 12 bytes (3 * f32)
/// - texcoord: 8 bytes (2 * f32)
/// - tangent: 12 bytes (3 * f32)
/// - **总计**: 44 bytes
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// 顶点位置 (x, y, z)
    pub position: [f32; 3],

    /// 法线向量 (nx, ny, nz)
    pub normal: [f32; 3],

    /// 纹理坐标 (u, v)
    pub texcoord: [f32; 2],

    /// 切线向量 (tx, ty, tz)
    pub tangent: [f32; 3],
}

impl Vertex {
    /// 创建一个新的顶点
    #[inline]
    pub fn new(
        position: [f32; 3],
        normal: [f32; 3],
        texcoord: [f32; 2],
        tangent: [f32; 3],
    ) -> Self {
        Self {
            position,
            normal,
            texcoord,
            tangent,
        }
    }

    /// 与结构体内存布局一致的顶点格式
    pub fn format() -> VertexFormat {
        VertexFormat::builder()
            .attribute(ATTRIB_NAME_POSITION, 3, AttribType::Float32)
            .attribute(ATTRIB_NAME_NORMAL, 3, AttribType::Float32)
            .attribute(ATTRIB_NAME_UV0, 2, AttribType::Float32)
            .attribute(ATTRIB_NAME_TANGENT, 3, AttribType::Float32)
            .build()
    }
}
