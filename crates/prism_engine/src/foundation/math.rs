//! Math type aliases
//!
//! The engine uses `nalgebra` throughout; these aliases keep signatures short.

/// 2D vector of f32
pub type Vec2 = nalgebra::Vector2<f32>;
/// 3D vector of f32
pub type Vec3 = nalgebra::Vector3<f32>;
/// 4x4 matrix of f32
pub type Mat4 = nalgebra::Matrix4<f32>;
/// Unit quaternion of f32
pub type Quat = nalgebra::UnitQuaternion<f32>;
