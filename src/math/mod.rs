pub mod aabb;
pub mod color;

pub use aabb::Aabb;
pub use color::Color3;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Per-vertex texture coordinate into a color table.
///
/// `x` selects the color, `y` selects the validity row of the texture.
pub type TexCoord = nalgebra::Vector2<f32>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
