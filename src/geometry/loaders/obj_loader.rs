/// OBJ 文件加载器
///
/// 使用 tobj crate 加载 Wavefront OBJ 格式的3D模型。
/// 文件中的所有对象合并为一个 `MeshData`，索引为 16 位。
use super::MeshLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::{MeshData, MAX_MESH_VERTICES};
use crate::geometry::vertex::Vertex;
use std::path::Path;

/// OBJ 格式加载器
///
/// # 特性
///
/// - 自动三角化
/// - UV 坐标翻转（V轴：1.0 - v）
/// - 缺失的法线填 0，缺失的 UV 填 0
/// - 顶点总数超出 16 位索引范围时报错
///
/// # 使用示例
///
/// ```rust,no_run
/// use batch_render::geometry::loaders::{MeshLoader, ObjLoader};
/// use std::path::Path;
///
/// let mesh = ObjLoader::load_from_file(Path::new("model.obj"))?;
/// println!("加载了 {} 个顶点", mesh.vertex_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ObjLoader;

impl ObjLoader {
    /// 把 tobj 的模型列表合并为一个网格
    fn build_mesh(name: &str, models: &[tobj::Model]) -> Result<MeshData> {
        if models.is_empty() {
            return Err(MeshLoadError::ValidationError("OBJ 文件不包含任何模型".to_string()).into());
        }

        let total_vertices: usize = models.iter().map(|m| m.mesh.positions.len() / 3).sum();
        if total_vertices > MAX_MESH_VERTICES {
            return Err(MeshLoadError::InvalidGeometry(format!(
                "顶点数量 {} 超出 16 位索引范围",
                total_vertices
            ))
            .into());
        }

        let mut mesh_data = MeshData::with_name(name);

        for model in models {
            let mesh = &model.mesh;
            let vertex_start = mesh_data.vertices.len();

            let positions = &mesh.positions;
            let normals = &mesh.normals;
            let texcoords = &mesh.texcoords;

            if positions.len() % 3 != 0 {
                return Err(MeshLoadError::InvalidGeometry(
                    format!("顶点位置数据不完整: {} 个浮点数", positions.len())
                ).into());
            }

            for i in 0..positions.len() / 3 {
                let position = [
                    positions[i * 3],
                    positions[i * 3 + 1],
                    positions[i * 3 + 2],
                ];

                let normal = if normals.len() >= (i + 1) * 3 {
                    [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]]
                } else {
                    [0.0, 0.0, 0.0]
                };

                let texcoord = if texcoords.len() >= (i + 1) * 2 {
                    [texcoords[i * 2], 1.0 - texcoords[i * 2 + 1]]
                } else {
                    [0.0, 0.0]
                };

                mesh_data.vertices.push(Vertex::new(position, normal, texcoord, [0.0, 0.0, 0.0]));
            }

            // 总顶点数已检查，偏移后的索引一定在 u16 范围内
            for &index in &mesh.indices {
                mesh_data.indices.push((vertex_start + index as usize) as u16);
            }
        }

        mesh_data.validate()
            .map_err(MeshLoadError::ValidationError)?;

        tracing::info!(
            "Loaded OBJ mesh '{}': {} vertices, {} triangles",
            name,
            mesh_data.vertex_count(),
            mesh_data.triangle_count()
        );

        Ok(mesh_data)
    }
}

impl MeshLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<MeshData> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };

        let (models, _materials) = tobj::load_obj(path, &load_options)
            .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        let name = path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed");

        Self::build_mesh(name, &models)
    }

    fn load_from_memory(data: &[u8]) -> Result<MeshData> {
        let load_options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };

        let mut reader = std::io::BufReader::new(data);
        // 内存中的 OBJ 不引用外部 .mtl
        let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options, |_| {
            Ok(Default::default())
        })
        .map_err(|e| MeshLoadError::ParseError(format!("tobj 解析失败: {}", e)))?;

        Self::build_mesh("Memory", &models)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}
