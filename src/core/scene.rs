//! 场景配置模块
//!
//! 描述节点树：每个节点的变换、父节点、顶点处理方式以及挂载的网格和效果。
//!
//! # 场景文件格式 (scene.toml)
//!
//! ```toml
//! [[nodes]]
//! name = "quad_a"
//! transform = { position = [-1.0, 0.0, 0.0] }
//!
//! [[nodes.meshes]]
//! effect = "sprite"
//! source = { kind = "quad", width = 1.0, height = 1.0 }
//!
//! [[nodes]]
//! name = "child"
//! parent = "quad_a"
//! vertex_mode = "pass_through"
//!
//! [[nodes.meshes]]
//! effect = "unlit"
//! source = { kind = "obj", path = "assets/models/cube.obj" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;
use crate::core::error::{Result, BatchRenderError, ConfigError};
use crate::math::{matrix, utils, Matrix4};
use crate::renderer::VertexMode;

/// 3D 变换数据
///
/// 包含位置、旋转和缩放信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// 位置 (x, y, z)
    #[serde(default = "default_position")]
    pub position: [f32; 3],

    /// 旋转（欧拉角，度数）(pitch, yaw, roll)
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 3],

    /// 缩放 (x, y, z)
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

fn default_position() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_rotation() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: default_position(),
            rotation: default_rotation(),
            scale: default_scale(),
        }
    }
}

impl Transform {
    /// 只有平移的变换
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            ..Self::default()
        }
    }

    /// 创建模型矩阵
    ///
    /// 变换顺序：缩放 -> 旋转 -> 平移
    pub fn to_matrix(&self) -> Matrix4 {
        let pitch = utils::deg_to_rad(self.rotation[0]);
        let yaw = utils::deg_to_rad(self.rotation[1]);
        let roll = utils::deg_to_rad(self.rotation[2]);

        let translation = matrix::translation(self.position[0], self.position[1], self.position[2]);
        let rotation = matrix::rotation_z(roll) * matrix::rotation_y(yaw) * matrix::rotation_x(pitch);
        let scale = matrix::scaling(self.scale[0], self.scale[1], self.scale[2]);

        // 组合：T * R * S
        translation * rotation * scale
    }
}

/// 网格来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshSource {
    /// XY 平面上的矩形
    Quad { width: f32, height: f32 },
    /// 单位三角形
    Triangle,
    /// OBJ 文件
    Obj { path: String },
}

/// 节点上的一个网格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// 网格来源
    pub source: MeshSource,

    /// 效果名，同名网格共享同一个效果
    pub effect: String,
}

/// 节点配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// 节点名称（场景内唯一）
    pub name: String,

    /// 父节点名称，缺省时挂在场景根节点下；父节点必须先声明
    #[serde(default)]
    pub parent: Option<String>,

    /// 局部变换
    #[serde(default)]
    pub transform: Transform,

    /// 顶点处理方式
    #[serde(default)]
    pub vertex_mode: VertexMode,

    /// 是否启用渲染
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 网格列表
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
}

fn default_enabled() -> bool {
    true
}

/// 场景配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 节点列表（按声明顺序构建）
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl Default for SceneConfig {
    /// 两个共享效果的矩形，外加一个挂在第一个矩形下、原样拷贝顶点的三角形
    fn default() -> Self {
        let quad = MeshSource::Quad { width: 1.0, height: 1.0 };
        Self {
            nodes: vec![
                NodeConfig {
                    name: "quad_a".to_string(),
                    parent: None,
                    transform: Transform::from_position(-1.0, 0.0, 0.0),
                    vertex_mode: VertexMode::Transformed,
                    enabled: true,
                    meshes: vec![MeshConfig { source: quad.clone(), effect: "sprite".to_string() }],
                },
                NodeConfig {
                    name: "quad_b".to_string(),
                    parent: None,
                    transform: Transform::from_position(1.0, 0.0, 0.0),
                    vertex_mode: VertexMode::Transformed,
                    enabled: true,
                    meshes: vec![MeshConfig { source: quad, effect: "sprite".to_string() }],
                },
                NodeConfig {
                    name: "overlay".to_string(),
                    parent: Some("quad_a".to_string()),
                    transform: Transform::default(),
                    vertex_mode: VertexMode::PassThrough,
                    enabled: true,
                    meshes: vec![MeshConfig { source: MeshSource::Triangle, effect: "unlit".to_string() }],
                },
            ],
        }
    }
}

impl SceneConfig {
    /// 从文件加载场景配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| BatchRenderError::Config(ConfigError::FileNotFound(format!(
                "Failed to read scene config file '{}': {}",
                path.display(),
                e
            ))))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| BatchRenderError::Config(ConfigError::ParseError(format!(
                "Failed to parse scene config: {}",
                e
            ))))
    }

    /// 从文件加载，如果文件不存在或无法解析则返回默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded scene config from: {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load scene config: {}, using defaults", e);
                    Self::default()
                }
            }
        } else {
            tracing::info!("Scene config not found, using defaults");
            Self::default()
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)
            .map_err(|e| BatchRenderError::Config(ConfigError::ParseError(format!(
                "Failed to serialize scene config: {}",
                e
            ))))?;

        fs::write(path, contents)?;

        tracing::info!("Saved scene config to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform() {
        let transform = Transform::default();
        assert_eq!(transform.position, [0.0, 0.0, 0.0]);
        assert_eq!(transform.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(transform.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_transform_to_matrix() {
        let transform = Transform::from_position(1.0, 2.0, 3.0);
        let matrix = transform.to_matrix();

        assert!((matrix[(0, 3)] - 1.0).abs() < 0.001);
        assert!((matrix[(1, 3)] - 2.0).abs() < 0.001);
        assert!((matrix[(2, 3)] - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_default_scene() {
        let scene = SceneConfig::default();
        assert_eq!(scene.nodes.len(), 3);
        assert_eq!(scene.nodes[2].parent.as_deref(), Some("quad_a"));
        assert_eq!(scene.nodes[2].vertex_mode, VertexMode::PassThrough);
    }

    #[test]
    fn test_parse_scene() {
        let scene = SceneConfig::from_toml_str(
            r#"
            [[nodes]]
            name = "a"
            transform = { position = [0.0, 1.0, 0.0] }

            [[nodes.meshes]]
            effect = "sprite"
            source = { kind = "quad", width = 2.0, height = 1.0 }

            [[nodes.meshes]]
            effect = "sprite"
            source = { kind = "triangle" }

            [[nodes]]
            name = "b"
            parent = "a"
            vertex_mode = "pass_through"
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(scene.nodes.len(), 2);
        let a = &scene.nodes[0];
        assert_eq!(a.transform.position, [0.0, 1.0, 0.0]);
        assert_eq!(a.transform.scale, [1.0, 1.0, 1.0]);
        assert_eq!(a.vertex_mode, VertexMode::Transformed);
        assert_eq!(a.meshes[0].source, MeshSource::Quad { width: 2.0, height: 1.0 });
        assert_eq!(a.meshes[1].source, MeshSource::Triangle);

        let b = &scene.nodes[1];
        assert!(!b.enabled);
        assert!(b.meshes.is_empty());
        assert_eq!(b.vertex_mode, VertexMode::PassThrough);
    }

    #[test]
    fn test_roundtrip_default_scene() {
        let text = toml::to_string_pretty(&SceneConfig::default()).unwrap();
        assert_eq!(SceneConfig::from_toml_str(&text).unwrap(), SceneConfig::default());
    }
}
