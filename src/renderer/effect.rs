//! 材质效果描述
//!
//! 渲染数据层不解释效果的内容，只保存和返回对它的非拥有引用，
//! 批处理器用它判断相邻网格能否合并成同一个绘制批次。

/// 效果（材质）描述符
#[derive(Debug, PartialEq, Eq)]
pub struct Effect {
    name: String,
}

impl Effect {
    /// 创建一个效果
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// 效果名称
    pub fn name(&self) -> &str {
        &self.name
    }
}
