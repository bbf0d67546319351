//! 场景构建
//!
//! 把 `SceneConfig` 变成可以交给 `RenderFlow` 的节点树。
//! 同名效果在整个场景中只创建一次，由 `Scene` 持有；渲染句柄只保留弱引用。

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use super::effect::Effect;
use super::node_proxy::NodeProxy;
use super::render_handle::RenderHandle;
use crate::core::error::{BatchRenderError, Result};
use crate::core::scene::{MeshSource, NodeConfig, SceneConfig};
use crate::geometry::{loaders, primitives, MeshData, Vertex, VertexFormat};

/// 场景根节点名称
pub const SCENE_ROOT_NAME: &str = "Scene";

/// 构建好的场景
#[derive(Debug)]
pub struct Scene {
    /// 根节点，配置中没有父节点的节点都挂在这里
    pub root: NodeProxy,

    /// 场景持有的效果，按首次出现的顺序排列
    pub effects: Vec<Rc<Effect>>,
}

impl Scene {
    /// 按名称查找效果
    pub fn effect(&self, name: &str) -> Option<&Rc<Effect>> {
        self.effects.iter().find(|effect| effect.name() == name)
    }
}

/// 按配置构建场景
///
/// 父节点必须在子节点之前声明，节点名在场景内唯一。
/// 网格来源产生的都是 [`Vertex`] 布局的顶点，`vfmt` 必须与 `Vertex::format()` 一致。
pub fn build_scene(config: &SceneConfig, vfmt: Rc<VertexFormat>) -> Result<Scene> {
    if *vfmt != Vertex::format() {
        return Err(BatchRenderError::Scene(format!(
            "Vertex format (stride {}) doesn't match the mesh vertex layout (stride {})",
            vfmt.stride(),
            Vertex::format().stride()
        )));
    }

    let mut root = NodeProxy::new(SCENE_ROOT_NAME);
    let mut effects: Vec<Rc<Effect>> = Vec::new();
    let mut effect_ids: HashMap<String, usize> = HashMap::new();

    for node_config in &config.nodes {
        if node_config.name == SCENE_ROOT_NAME || root.find(&node_config.name).is_some() {
            return Err(BatchRenderError::Scene(format!(
                "Duplicate node name '{}'",
                node_config.name
            )));
        }

        let mut node = NodeProxy::with_transform(&node_config.name, node_config.transform.clone());
        if !node_config.meshes.is_empty() {
            let handle = build_handle(node_config, &vfmt, &mut effects, &mut effect_ids)?;
            node.set_render_handle(handle);
        }

        let parent = match node_config.parent.as_deref() {
            None => &mut root,
            Some(parent_name) => root.find_mut(parent_name).ok_or_else(|| {
                BatchRenderError::Scene(format!(
                    "Node '{}' references unknown parent '{}'",
                    node_config.name, parent_name
                ))
            })?,
        };
        parent.add_child(node);

        tracing::debug!(
            node = %node_config.name,
            meshes = node_config.meshes.len(),
            "Scene node built"
        );
    }

    tracing::info!(
        nodes = config.nodes.len(),
        effects = effects.len(),
        "Scene built"
    );

    Ok(Scene { root, effects })
}

fn build_handle(
    node_config: &NodeConfig,
    vfmt: &Rc<VertexFormat>,
    effects: &mut Vec<Rc<Effect>>,
    effect_ids: &mut HashMap<String, usize>,
) -> Result<RenderHandle> {
    let mut handle = RenderHandle::new(Rc::clone(vfmt));
    handle.set_vertex_mode(node_config.vertex_mode);
    handle.set_mesh_count(node_config.meshes.len());

    for (index, mesh_config) in node_config.meshes.iter().enumerate() {
        let mesh = load_source(&mesh_config.source)?;
        mesh.validate().map_err(|reason| {
            BatchRenderError::Scene(format!(
                "Node '{}' mesh {}: {}",
                node_config.name, index, reason
            ))
        })?;

        let (vertices, indices) = mesh.to_typed_arrays();
        handle.update_native_mesh(index, vertices, indices);

        let id = *effect_ids.entry(mesh_config.effect.clone()).or_insert_with(|| {
            effects.push(Rc::new(Effect::new(mesh_config.effect.clone())));
            effects.len() - 1
        });
        handle.update_native_effect(index, &effects[id]);
    }

    if node_config.enabled {
        handle.enable();
    }
    Ok(handle)
}

fn load_source(source: &MeshSource) -> Result<MeshData> {
    match source {
        MeshSource::Quad { width, height } => Ok(primitives::quad(*width, *height)),
        MeshSource::Triangle => Ok(primitives::triangle()),
        MeshSource::Obj { path } => loaders::load_mesh(Path::new(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BatchConfig;
    use crate::renderer::{RenderFlow, VertexMode};

    #[test]
    fn test_build_default_scene() {
        let vfmt = Rc::new(Vertex::format());
        let scene = build_scene(&SceneConfig::default(), Rc::clone(&vfmt)).unwrap();

        assert_eq!(scene.root.name(), SCENE_ROOT_NAME);
        assert_eq!(scene.root.children().len(), 2);
        assert_eq!(scene.effects.len(), 2);

        let overlay = scene.root.find("overlay").unwrap();
        let handle = overlay.render_handle().unwrap();
        assert_eq!(handle.vertex_mode(), VertexMode::PassThrough);
        assert!(handle.is_enabled());

        // 两个矩形共享同一个效果
        let a = scene.root.find("quad_a").unwrap().render_handle().unwrap().effect(0).unwrap();
        let b = scene.root.find("quad_b").unwrap().render_handle().unwrap().effect(0).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert!(Rc::ptr_eq(&a, scene.effect("sprite").unwrap()));
    }

    #[test]
    fn test_render_default_scene() {
        let vfmt = Rc::new(Vertex::format());
        let mut scene = build_scene(&SceneConfig::default(), Rc::clone(&vfmt)).unwrap();
        let mut flow = RenderFlow::from_config(&BatchConfig::default(), vfmt);

        let stats = flow.render(&mut scene.root);
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.vertices, 4 + 3 + 4);
        assert_eq!(stats.indices, 6 + 3 + 6);
        // quad_a(sprite) -> overlay(unlit) -> quad_b(sprite)
        assert_eq!(stats.batches, 3);
    }

    #[test]
    fn test_dropping_scene_effects_skips_meshes() {
        let vfmt = Rc::new(Vertex::format());
        let Scene { mut root, effects } = build_scene(&SceneConfig::default(), Rc::clone(&vfmt)).unwrap();
        drop(effects);

        let mut flow = RenderFlow::from_config(&BatchConfig::default(), vfmt);
        let stats = flow.render(&mut root);
        assert_eq!(stats.vertices, 0);
        assert_eq!(stats.batches, 0);
    }

    #[test]
    fn test_unknown_parent() {
        let config = SceneConfig::from_toml_str(
            r#"
            [[nodes]]
            name = "child"
            parent = "later"

            [[nodes]]
            name = "later"
            "#,
        )
        .unwrap();

        let err = build_scene(&config, Rc::new(Vertex::format())).unwrap_err();
        assert!(matches!(err, BatchRenderError::Scene(_)));
    }

    #[test]
    fn test_rejects_foreign_vertex_format() {
        let err = build_scene(&SceneConfig::default(), Rc::new(VertexFormat::pos_uv_color())).unwrap_err();
        assert!(matches!(err, BatchRenderError::Scene(_)));
    }

    #[test]
    fn test_duplicate_name() {
        let config = SceneConfig::from_toml_str(
            r#"
            [[nodes]]
            name = "a"

            [[nodes]]
            name = "a"
            "#,
        )
        .unwrap();

        assert!(build_scene(&config, Rc::new(Vertex::format())).is_err());
    }

    #[test]
    fn test_disabled_node_and_missing_obj() {
        let config = SceneConfig::from_toml_str(
            r#"
            [[nodes]]
            name = "hidden"
            enabled = false

            [[nodes.meshes]]
            effect = "sprite"
            source = { kind = "triangle" }
            "#,
        )
        .unwrap();
        let scene = build_scene(&config, Rc::new(Vertex::format())).unwrap();
        assert!(!scene.root.find("hidden").unwrap().render_handle().unwrap().is_enabled());

        let config = SceneConfig::from_toml_str(
            r#"
            [[nodes]]
            name = "model"

            [[nodes.meshes]]
            effect = "sprite"
            source = { kind = "obj", path = "missing/model.obj" }
            "#,
        )
        .unwrap();
        let err = build_scene(&config, Rc::new(Vertex::format())).unwrap_err();
        assert!(matches!(err, BatchRenderError::MeshLoading(_)));
    }
}
