//! 脚本层类型化数组

use std::cell::Cell;

use bytemuck::Pod;

use super::ScriptObject;

/// 脚本层分配的类型化数组
///
/// 内容在创建后不可变；网格数据更新时脚本层会创建新的数组并重新绑定。
/// 共享方式为 `Rc<TypedArray>`，强引用计数对应脚本引擎的 incRef/decRef，
/// `root_count` 对应垃圾回收器的 root 集合。
#[derive(Debug)]
pub struct TypedArray {
    data: Box<[u8]>,
    root_count: Cell<u32>,
}

impl TypedArray {
    /// 从原始字节创建
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            data: bytes.into(),
            root_count: Cell::new(0),
        }
    }

    /// 从任意 POD 切片创建（如 `&[f32]`、`&[u16]`、`&[Vertex]`）
    pub fn from_pod<T: Pod>(values: &[T]) -> Self {
        Self::from_bytes(bytemuck::cast_slice::<T, u8>(values).to_vec())
    }

    /// 字节长度
    #[inline]
    pub fn byte_length(&self) -> usize {
        self.data.len()
    }

    /// 当前 root 次数
    #[inline]
    pub fn root_count(&self) -> u32 {
        self.root_count.get()
    }
}

impl ScriptObject for TypedArray {
    fn root(&self) {
        self.root_count.set(self.root_count.get() + 1);
    }

    fn unroot(&self) {
        let count = self.root_count.get();
        debug_assert!(count > 0, "TypedArray::unroot called on an unrooted array");
        self.root_count.set(count.saturating_sub(1));
    }

    fn is_rooted(&self) -> bool {
        self.root_count.get() > 0
    }

    fn typed_array_data(&self) -> &[u8] {
        &self.data
    }
}
