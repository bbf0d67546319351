//! 统一的数学库模块
//!
//! 基于 `nalgebra`，提供变换矩阵和点变换相关的类型与函数。
//!
//! # 模块组织
//!
//! - **基础类型**：Vector2/3/4, Matrix4
//! - **常量**：PI, DEG_TO_RAD 等
//! - **工具函数**：deg_to_rad, approx_eq
//! - **矩阵辅助函数**：translation, scaling, rotation 等
//! - **点变换**：`transform_point`

pub use nalgebra::{
    Matrix4 as Mat4,
    Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4,
};

// 类型别名，使用更简洁的名称
pub type Vector2 = Vec2<f32>;
pub type Vector3 = Vec3<f32>;
pub type Vector4 = Vec4<f32>;
pub type Matrix4 = Mat4<f32>;

/// 数学常量
pub mod constants {
    /// π
    pub const PI: f32 = std::f32::consts::PI;

    /// 角度转弧度的系数
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// 浮点数比较的 epsilon
    pub const EPSILON: f32 = 1e-6;
}

/// 数学工具函数
pub mod utils {
    use super::*;

    /// 角度转弧度
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// 检查两个浮点数是否近似相等
    pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }
}

/// 矩阵辅助函数
pub mod matrix {
    use super::*;

    /// 创建平移矩阵
    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4 {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// 创建缩放矩阵
    pub fn scaling(x: f32, y: f32, z: f32) -> Matrix4 {
        Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z))
    }

    /// 创建绕 X 轴旋转的矩阵
    pub fn rotation_x(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::x_axis(), angle)
    }

    /// 创建绕 Y 轴旋转的矩阵
    pub fn rotation_y(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::y_axis(), angle)
    }

    /// 创建绕 Z 轴旋转的矩阵
    pub fn rotation_z(angle: f32) -> Matrix4 {
        Matrix4::from_axis_angle(&Vector3::z_axis(), angle)
    }
}

/// 以点的方式变换一个三维坐标
///
/// 按齐次坐标 `(x, y, z, 1)` 与矩阵相乘。仿射矩阵下 w 恒为 1；
/// 投影矩阵下结果除以 w（w 为 0 时不做除法）。
#[inline]
pub fn transform_point(mat: &Matrix4, point: &Vector3) -> Vector3 {
    let v = mat * Vector4::new(point.x, point.y, point.z, 1.0);
    if v.w != 0.0 && v.w != 1.0 {
        Vector3::new(v.x / v.w, v.y / v.w, v.z / v.w)
    } else {
        Vector3::new(v.x, v.y, v.z)
    }
}
