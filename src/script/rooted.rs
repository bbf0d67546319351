//! 脚本对象保活句柄

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::ScriptObject;

/// 脚本对象的保活句柄
///
/// 构造时对对象执行一次 `root()` 并持有一个强引用，`Drop` 时执行一次 `unroot()`
/// 并释放强引用。每次获取恰好对应一次释放，替换或销毁持有者即可释放旧对象。
///
/// # 示例
///
/// ```
/// use std::rc::Rc;
/// use batch_render::script::{Rooted, ScriptObject, TypedArray};
///
/// let array = Rc::new(TypedArray::from_pod(&[0u16, 1, 2]));
/// {
///     let rooted = Rooted::new(Rc::clone(&array));
///     assert!(rooted.is_rooted());
///     assert_eq!(Rc::strong_count(&array), 2);
/// }
/// assert!(!array.is_rooted());
/// assert_eq!(Rc::strong_count(&array), 1);
/// ```
pub struct Rooted<T: ScriptObject> {
    object: Rc<T>,
}

impl<T: ScriptObject> Rooted<T> {
    /// root 对象并持有它
    pub fn new(object: Rc<T>) -> Self {
        object.root();
        Self { object }
    }

    /// 被保活的对象
    pub fn object(&self) -> &Rc<T> {
        &self.object
    }
}

impl<T: ScriptObject> Deref for Rooted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.object
    }
}

impl<T: ScriptObject> Drop for Rooted<T> {
    fn drop(&mut self) {
        self.object.unroot();
    }
}

impl<T: ScriptObject> fmt::Debug for Rooted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rooted")
            .field("bytes", &self.object.typed_array_data().len())
            .field("strong_count", &Rc::strong_count(&self.object))
            .finish()
    }
}
