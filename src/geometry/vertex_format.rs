/// 顶点格式描述
///
/// 描述交错顶点数据中每个属性的字节偏移、分量数和分量类型。
/// 一个 `RenderHandle` 的所有网格共享同一个顶点格式，共享缓冲区也按它计算字节偏移。

/// 位置属性名
pub const ATTRIB_NAME_POSITION: &str = "a_position";
/// 法线属性名
pub const ATTRIB_NAME_NORMAL: &str = "a_normal";
/// 第一套 UV 属性名
pub const ATTRIB_NAME_UV0: &str = "a_uv0";
/// 顶点颜色属性名
pub const ATTRIB_NAME_COLOR: &str = "a_color";
/// 切线属性名
pub const ATTRIB_NAME_TANGENT: &str = "a_tangent";

/// 属性分量类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribType {
    /// 32 位浮点
    Float32,
    /// 8 位无符号整数（通常为归一化颜色）
    Uint8,
    /// 16 位无符号整数
    Uint16,
}

impl AttribType {
    /// 单个分量的字节数
    #[inline]
    pub fn size(&self) -> u32 {
        match self {
            AttribType::Float32 => 4,
            AttribType::Uint8 => 1,
            AttribType::Uint16 => 2,
        }
    }
}

/// 单个顶点属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexElement {
    /// 属性名
    pub name: String,

    /// 在一个顶点内的字节偏移
    pub offset: u32,

    /// 分量数量
    pub num: u32,

    /// 分量类型
    pub ty: AttribType,
}

impl VertexElement {
    /// 属性占用的字节数
    #[inline]
    pub fn bytes(&self) -> u32 {
        self.num * self.ty.size()
    }
}

/// 顶点格式
///
/// # 示例
///
/// ```rust
/// use batch_render::geometry::vertex_format::{AttribType, VertexFormat, ATTRIB_NAME_POSITION};
///
/// let vfmt = VertexFormat::builder()
///     .attribute(ATTRIB_NAME_POSITION, 3, AttribType::Float32)
///     .build();
///
/// assert_eq!(vfmt.stride(), 12);
/// assert_eq!(vfmt.element(ATTRIB_NAME_POSITION).unwrap().num, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexFormat {
    elements: Vec<VertexElement>,
    stride: u32,
}

impl VertexFormat {
    /// 开始构建一个顶点格式
    pub fn builder() -> VertexFormatBuilder {
        VertexFormatBuilder::default()
    }

    /// 2D 位置 + UV + 打包 RGBA8 颜色，20 字节
    pub fn pos_uv_color() -> Self {
        Self::builder()
            .attribute(ATTRIB_NAME_POSITION, 2, AttribType::Float32)
            .attribute(ATTRIB_NAME_UV0, 2, AttribType::Float32)
            .attribute(ATTRIB_NAME_COLOR, 4, AttribType::Uint8)
            .build()
    }

    /// 3D 位置 + UV + 打包 RGBA8 颜色，24 字节
    pub fn pos3_uv_color() -> Self {
        Self::builder()
            .attribute(ATTRIB_NAME_POSITION, 3, AttribType::Float32)
            .attribute(ATTRIB_NAME_UV0, 2, AttribType::Float32)
            .attribute(ATTRIB_NAME_COLOR, 4, AttribType::Uint8)
            .build()
    }

    /// 每个顶点的字节数
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// 按名称查找属性
    pub fn element(&self, name: &str) -> Option<&VertexElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// 全部属性（按声明顺序）
    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }
}

/// 顶点格式构建器
///
/// 属性按声明顺序紧密排列，偏移自动累加。
#[derive(Debug, Default)]
pub struct VertexFormatBuilder {
    elements: Vec<VertexElement>,
    offset: u32,
}

impl VertexFormatBuilder {
    /// 追加一个属性
    pub fn attribute(mut self, name: impl Into<String>, num: u32, ty: AttribType) -> Self {
        let element = VertexElement {
            name: name.into(),
            offset: self.offset,
            num,
            ty,
        };
        self.offset += element.bytes();
        self.elements.push(element);
        self
    }

    /// 完成构建
    pub fn build(self) -> VertexFormat {
        VertexFormat {
            elements: self.elements,
            stride: self.offset,
        }
    }
}
