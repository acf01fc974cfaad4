//! Core types shared by the alignment kernels and the search engine.

mod alignment;
mod params;
mod structure;
mod transform;

pub use alignment::{Alignment, GAP};
pub use params::ScoringParams;
pub use structure::Structure;
pub use transform::Transform;

/// 3D coordinate of a residue (Å).
pub type Vec3 = nalgebra::Vector3<f64>;
/// 3×3 rotation matrix.
pub type Mat3 = nalgebra::Matrix3<f64>;

/// Squared euclidean distance between two points.
#[inline]
pub fn dist2(a: &Vec3, b: &Vec3) -> f64 {
    (a - b).norm_squared()
}
