//! 节点代理
//!
//! 渲染遍历看到的节点：局部变换、本帧的世界矩阵、可选的渲染句柄和子节点。

use crate::core::scene::Transform;
use crate::math::Matrix4;

use super::render_handle::RenderHandle;

/// 节点代理
#[derive(Debug)]
pub struct NodeProxy {
    name: String,
    transform: Transform,
    world_mat: Matrix4,
    handle: Option<RenderHandle>,
    children: Vec<NodeProxy>,
}

impl NodeProxy {
    /// 创建一个空节点
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            world_mat: Matrix4::identity(),
            handle: None,
            children: Vec::new(),
        }
    }

    /// 创建带局部变换的节点
    pub fn with_transform(name: impl Into<String>, transform: Transform) -> Self {
        let mut node = Self::new(name);
        node.transform = transform;
        node
    }

    /// 节点名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 局部变换
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// 可修改的局部变换，下一次遍历时生效
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// 最近一次遍历计算出的世界矩阵
    pub fn world_matrix(&self) -> &Matrix4 {
        &self.world_mat
    }

    /// 按父节点世界矩阵更新本节点世界矩阵
    pub fn update_world_matrix(&mut self, parent: &Matrix4) {
        self.world_mat = parent * self.transform.to_matrix();
    }

    /// 挂载渲染句柄，返回之前的句柄
    pub fn set_render_handle(&mut self, handle: RenderHandle) -> Option<RenderHandle> {
        self.handle.replace(handle)
    }

    /// 渲染句柄
    ///
    /// 遍历处理本节点期间句柄被暂时取出，此时返回 `None`。
    pub fn render_handle(&self) -> Option<&RenderHandle> {
        self.handle.as_ref()
    }

    /// 可修改的渲染句柄
    pub fn render_handle_mut(&mut self) -> Option<&mut RenderHandle> {
        self.handle.as_mut()
    }

    pub(crate) fn take_render_handle(&mut self) -> Option<RenderHandle> {
        self.handle.take()
    }

    pub(crate) fn restore_render_handle(&mut self, handle: Option<RenderHandle>) {
        self.handle = handle;
    }

    /// 添加子节点
    pub fn add_child(&mut self, child: NodeProxy) {
        self.children.push(child);
    }

    /// 子节点
    pub fn children(&self) -> &[NodeProxy] {
        &self.children
    }

    /// 可修改的子节点
    pub fn children_mut(&mut self) -> &mut [NodeProxy] {
        &mut self.children
    }

    /// 在以本节点为根的子树中按名称查找（深度优先）
    pub fn find(&self, name: &str) -> Option<&NodeProxy> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// 在以本节点为根的子树中按名称查找可修改节点（深度优先）
    pub fn find_mut(&mut self, name: &str) -> Option<&mut NodeProxy> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{transform_point, Vector3};

    #[test]
    fn test_world_matrix_composition() {
        let mut parent = NodeProxy::with_transform("parent", Transform::from_position(1.0, 0.0, 0.0));
        let mut child = NodeProxy::with_transform("child", Transform::from_position(0.0, 2.0, 0.0));

        parent.update_world_matrix(&Matrix4::identity());
        child.update_world_matrix(parent.world_matrix());

        let p = transform_point(child.world_matrix(), &Vector3::zeros());
        assert_eq!(p, Vector3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_find() {
        let mut root = NodeProxy::new("root");
        let mut a = NodeProxy::new("a");
        a.add_child(NodeProxy::new("b"));
        root.add_child(a);

        assert_eq!(root.find("b").map(NodeProxy::name), Some("b"));
        assert!(root.find("missing").is_none());

        root.find_mut("b").unwrap().transform_mut().position = [3.0, 0.0, 0.0];
        assert_eq!(root.children()[0].children()[0].transform().position[0], 3.0);
    }
}
