//! 基础几何体
//!
//! 生成以原点为中心、位于 XY 平面上的简单网格，法线朝 +Z。

use super::mesh::MeshData;
use super::vertex::Vertex;

const NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
const TANGENT: [f32; 3] = [1.0, 0.0, 0.0];

/// 宽 `width`、高 `height` 的矩形，4 个顶点、2 个三角形
pub fn quad(width: f32, height: f32) -> MeshData {
    let hw = width * 0.5;
    let hh = height * 0.5;

    let mut mesh = MeshData::with_name("Quad");
    mesh.vertices = vec![
        Vertex::new([-hw, -hh, 0.0], NORMAL, [0.0, 1.0], TANGENT),
        Vertex::new([hw, -hh, 0.0], NORMAL, [1.0, 1.0], TANGENT),
        Vertex::new([hw, hh, 0.0], NORMAL, [1.0, 0.0], TANGENT),
        Vertex::new([-hw, hh, 0.0], NORMAL, [0.0, 0.0], TANGENT),
    ];
    mesh.indices = vec![0, 1, 2, 0, 2, 3];
    mesh
}

/// 单位三角形
pub fn triangle() -> MeshData {
    let mut mesh = MeshData::with_name("Triangle");
    mesh.vertices = vec![
        Vertex::new([0.0, 0.5, 0.0], NORMAL, [0.5, 0.0], TANGENT),
        Vertex::new([0.5, -0.5, 0.0], NORMAL, [1.0, 1.0], TANGENT),
        Vertex::new([-0.5, -0.5, 0.0], NORMAL, [0.0, 1.0], TANGENT),
    ];
    mesh.indices = vec![0, 1, 2];
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad() {
        let mesh = quad(2.0, 4.0);
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[2].position, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_triangle() {
        let mesh = triangle();
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.triangle_count(), 1);
    }
}
