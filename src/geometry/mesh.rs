/// 网格数据结构模块
///
/// 定义CPU侧的网格数据容器。网格数据不会直接交给渲染层，
/// 而是先转换成脚本层的类型化数组，再通过 `RenderHandle::update_native_mesh` 绑定。

use std::rc::Rc;

use super::vertex::Vertex;
use crate::script::TypedArray;

/// 共享缓冲区使用 16 位索引，单个网格的顶点数不能超过这个值
pub const MAX_MESH_VERTICES: usize = u16::MAX as usize + 1;

/// CPU侧网格数据
///
/// # 示例
///
/// ```rust
/// use batch_render::geometry::mesh::MeshData;
/// use batch_render::geometry::vertex::Vertex;
///
/// let mesh = MeshData {
///     vertices: vec![
///         Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0], [1.0, 0.0, 0.0]),
///         Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0], [1.0, 0.0, 0.0]),
///         Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0], [1.0, 0.0, 0.0]),
///     ],
///     indices: vec![0, 1, 2],
///     name: Some("Triangle".to_string()),
/// };
/// assert!(mesh.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// 顶点数组
    pub vertices: Vec<Vertex>,

    /// 16 位三角形索引，每3个索引定义一个三角形
    pub indices: Vec<u16>,

    /// 网格名称（可选）
    pub name: Option<String>,
}

impl MeshData {
    /// 创建一个空的网格数据
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个指定名称的空网格数据
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// 获取顶点数量
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取索引数量
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// 获取三角形数量
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 顶点数量不超过 16 位索引范围
    /// - 索引数量是3的倍数
    /// - 所有索引都在有效范围内
    pub fn validate(&self) -> Result<(), String> {
        if self.vertices.len() > MAX_MESH_VERTICES {
            return Err(format!(
                "顶点数量 {} 超出 16 位索引范围 ({})",
                self.vertices.len(),
                MAX_MESH_VERTICES
            ));
        }

        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "索引数量必须是3的倍数，当前为: {}",
                self.indices.len()
            ));
        }

        let vertex_count = self.vertices.len();
        for (i, &index) in self.indices.iter().enumerate() {
            if index as usize >= vertex_count {
                return Err(format!(
                    "索引 {} 处的值 {} 超出顶点范围 (共 {} 个顶点)",
                    i, index, vertex_count
                ));
            }
        }

        Ok(())
    }

    /// 转换为脚本层的 (顶点, 索引) 类型化数组
    ///
    /// 顶点按 [`Vertex::format`] 的布局交错排列。
    pub fn to_typed_arrays(&self) -> (Rc<TypedArray>, Rc<TypedArray>) {
        (
            Rc::new(TypedArray::from_pod(&self.vertices)),
            Rc::new(TypedArray::from_pod(&self.indices)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptObject;

    fn triangle() -> MeshData {
        let mut mesh = MeshData::with_name("Test");
        mesh.vertices.push(Vertex::default());
        mesh.vertices.push(Vertex::default());
        mesh.vertices.push(Vertex::default());
        mesh.indices.extend_from_slice(&[0, 1, 2]);
        mesh
    }

    #[test]
    fn test_mesh_data_counts() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.name, Some("Test".to_string()));
    }

    #[test]
    fn test_mesh_data_validation() {
        assert!(triangle().validate().is_ok());

        let mut mesh = triangle();
        mesh.indices.pop();
        assert!(mesh.validate().is_err());

        let mut mesh = triangle();
        mesh.indices[2] = 5;
        let result = mesh.validate();
        assert!(result.unwrap_err().contains("超出顶点范围"));
    }

    #[test]
    fn test_to_typed_arrays() {
        let (vertices, indices) = triangle().to_typed_arrays();
        assert_eq!(vertices.byte_length(), 3 * 44);
        assert_eq!(indices.byte_length(), 6);
        assert!(!vertices.is_rooted());
    }
}
