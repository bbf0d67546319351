//! batch_render 演示程序
//!
//! 加载配置和场景，构建节点树，然后运行若干帧批处理并输出每帧统计。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件
//! cargo run
//!
//! # 命令行覆盖
//! cargo run -- --frames 10 --log-level debug
//! ```

use std::rc::Rc;

use anyhow::Context;
use tracing::info;

use batch_render::core::{log, Config, SceneConfig};
use batch_render::geometry::Vertex;
use batch_render::renderer::{build_scene, RenderFlow};

/// 每帧根节点绕 Z 轴旋转的角度（度）
const SPIN_PER_FRAME: f32 = 15.0;

/// 程序入口
///
/// 1. 加载引擎配置文件（config.toml）并应用命令行参数
/// 2. 初始化日志系统
/// 3. 加载场景配置文件（scene.toml）并构建节点树
/// 4. 逐帧旋转根节点并批处理整棵树
fn main() -> anyhow::Result<()> {
    let mut config = Config::from_file_or_default("config.toml");
    config.apply_args(std::env::args());
    config.validate().context("Invalid configuration")?;

    let log_file = if config.logging.file_output {
        Some(config.logging.log_file.as_str())
    } else {
        None
    };
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!(version = env!("CARGO_PKG_VERSION"), "batch_render starting...");

    let scene_config = SceneConfig::from_file_or_default("scene.toml");
    let vfmt = Rc::new(Vertex::format());
    let mut scene = build_scene(&scene_config, Rc::clone(&vfmt)).context("Failed to build scene")?;

    info!(
        vertex_capacity = config.batch.initial_vertex_capacity,
        index_capacity = config.batch.initial_index_capacity,
        frames = config.batch.frames,
        "Batch configuration"
    );

    let mut flow = RenderFlow::from_config(&config.batch, vfmt);

    for frame in 0..config.batch.frames {
        scene.root.transform_mut().rotation[2] += SPIN_PER_FRAME;

        let stats = flow.render(&mut scene.root);
        info!(
            frame,
            nodes = stats.nodes,
            batches = stats.batches,
            vertices = stats.vertices,
            indices = stats.indices,
            "Frame batched"
        );
    }

    info!(effects = scene.effects.len(), "batch_render finished");
    Ok(())
}
