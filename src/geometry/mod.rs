/// 几何数据模块
///
/// 提供顶点格式描述、CPU 侧网格数据、基础几何体以及模型加载。
///
/// # 模块结构
///
/// - `vertex_format`: 顶点属性布局描述
/// - `vertex`: 完整网格顶点结构
/// - `mesh`: CPU 侧网格数据
/// - `primitives`: 基础几何体
/// - `loaders`: 模型加载器
///
/// # 数据流
///
/// ```text
/// 文件 (OBJ) / primitives
///     ↓
/// MeshData (CPU侧数据)
///     ↓
/// TypedArray (脚本层缓冲区)
///     ↓
/// RenderHandle (绑定、世界空间变换、填充共享缓冲区)
/// ```

pub mod vertex_format;
pub mod vertex;
pub mod mesh;
pub mod primitives;
pub mod loaders;

// 重新导出常用类型
pub use vertex_format::{AttribType, VertexElement, VertexFormat, ATTRIB_NAME_POSITION};
pub use vertex::Vertex;
pub use mesh::MeshData;
