//! 脚本层对象边界
//!
//! 顶点/索引数据由脚本层分配（typed array），本地渲染层只持有它们的视图。
//! 只要本地层还在引用某个脚本对象，就必须保证它被 root 住且引用计数不为零，
//! 否则垃圾回收器可能在填充缓冲区的过程中回收这块内存。
//!
//! - [`ScriptObject`]：脚本对象需要暴露的 root/unroot 与数据访问接口
//! - [`TypedArray`]：脚本层的类型化数组
//! - [`Rooted`]：保活句柄，构造时 root + 增加强引用，析构时 unroot + 释放强引用

mod rooted;
mod typed_array;

pub use rooted::Rooted;
pub use typed_array::TypedArray;

/// 可以被本地层 root 住的脚本对象
pub trait ScriptObject {
    /// 增加一次 root，阻止垃圾回收
    fn root(&self);

    /// 撤销一次 root
    fn unroot(&self);

    /// 当前是否处于 root 状态
    fn is_rooted(&self) -> bool;

    /// 类型化数组的底层字节
    fn typed_array_data(&self) -> &[u8];
}
