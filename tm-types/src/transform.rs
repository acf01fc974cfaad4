use crate::{Mat3, Vec3};

/// A rigid-body transform, always applied as `x' = t + u·x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub t: Vec3,
    pub u: Mat3,
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            t: Vec3::zeros(),
            u: Mat3::identity(),
        }
    }

    #[inline]
    pub fn apply(&self, x: &Vec3) -> Vec3 {
        self.t + self.u * x
    }

    /// Transform `src` into `dst`. Only the first `src.len()` entries of
    /// `dst` are written; `dst` may be a longer scratch buffer.
    pub fn apply_all(&self, src: &[Vec3], dst: &mut [Vec3]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = self.apply(s);
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
