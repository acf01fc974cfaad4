use tm_types::{Mat3, Transform, Vec3};

/// An optimal rigid superposition of two paired point lists.
#[derive(Clone, Copy, Debug)]
pub struct Superposition {
    pub transform: Transform,
    /// Mean squared deviation `Σ‖t + u·p_i − q_i‖² / n` under the transform.
    pub msd: f64,
}

/// Kabsch superposition: the proper rotation `u` and translation `t`
/// minimizing `Σ‖t + u·p_i − q_i‖²` over the paired points.
///
/// Computed from the SVD of the cross-covariance of the centered sets, with
/// the determinant sign fixed on the smallest singular direction so `u` is
/// always a rotation, also for colinear or otherwise degenerate input. A
/// failed decomposition falls back to the identity rotation; the residual is
/// still reported, so such a candidate simply loses on score.
pub fn kabsch(p: &[Vec3], q: &[Vec3]) -> Superposition {
    assert_eq!(p.len(), q.len());
    let n = p.len();
    if n == 0 {
        return Superposition {
            transform: Transform::identity(),
            msd: 0.0,
        };
    }

    let inv_n = 1.0 / n as f64;
    let pc = p.iter().fold(Vec3::zeros(), |a, v| a + v) * inv_n;
    let qc = q.iter().fold(Vec3::zeros(), |a, v| a + v) * inv_n;

    if n == 1 {
        return Superposition {
            transform: Transform {
                t: qc - pc,
                u: Mat3::identity(),
            },
            msd: 0.0,
        };
    }

    let mut h = Mat3::zeros();
    for (pi, qi) in p.iter().zip(q) {
        h += (pi - pc) * (qi - qc).transpose();
    }

    let svd = h.svd(true, true);
    let u = match (svd.u, svd.v_t) {
        (Some(svd_u), Some(v_t)) => {
            let v = v_t.transpose();
            let mut d = Mat3::identity();
            // Singular values are sorted descending, so the flip lands on
            // the smallest singular direction.
            if (v * svd_u.transpose()).determinant() < 0.0 {
                d[(2, 2)] = -1.0;
            }
            v * d * svd_u.transpose()
        }
        _ => Mat3::identity(),
    };

    let transform = Transform { t: qc - u * pc, u };
    let msd = p
        .iter()
        .zip(q)
        .map(|(pi, qi)| (transform.apply(pi) - qi).norm_squared())
        .sum::<f64>()
        * inv_n;
    Superposition { transform, msd }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn points() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.5, 0.2, -0.3),
            Vec3::new(2.9, 1.1, 0.4),
            Vec3::new(3.1, 2.8, 1.9),
            Vec3::new(1.7, 3.4, 3.0),
        ]
    }

    fn rot_z(angle: f64) -> Mat3 {
        let (s, c) = angle.sin_cos();
        Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
    }

    fn assert_proper_rotation(u: &Mat3) {
        assert!((u.determinant() - 1.0).abs() < 1e-6);
        assert!(((u.transpose() * u) - Mat3::identity()).norm() < 1e-6);
    }

    #[test]
    fn identity_fit() {
        let p = points();
        let s = kabsch(&p, &p);
        assert!(s.msd < 1e-12);
        assert_proper_rotation(&s.transform.u);
        assert!(s.transform.t.norm() < 1e-9);
    }

    #[test]
    fn recovers_known_rotation() {
        let p = points();
        let r = rot_z(PI / 6.0);
        let t = Vec3::new(4.0, -2.0, 7.5);
        let q: Vec<Vec3> = p.iter().map(|x| t + r * x).collect();
        let s = kabsch(&p, &q);
        assert!(s.msd < 1e-12);
        assert!((s.transform.u - r).norm() < 1e-9);
        assert!((s.transform.t - t).norm() < 1e-9);
    }

    #[test]
    fn colinear_input_still_yields_rotation() {
        let p: Vec<Vec3> = (0..4).map(|i| Vec3::new(i as f64, 0.0, 0.0)).collect();
        let q: Vec<Vec3> = (0..4).map(|i| Vec3::new(0.0, i as f64, 0.0)).collect();
        let s = kabsch(&p, &q);
        assert_proper_rotation(&s.transform.u);
        assert!(s.msd < 1e-9);
    }

    #[test]
    fn single_pair_is_translation() {
        let p = [Vec3::new(1.0, 2.0, 3.0)];
        let q = [Vec3::new(-1.0, 0.5, 2.0)];
        let s = kabsch(&p, &q);
        assert_eq!(s.transform.u, Mat3::identity());
        assert!((s.transform.apply(&p[0]) - q[0]).norm() < 1e-12);
    }

    #[test]
    fn reflection_is_rejected() {
        // A mirrored set must still come back as a proper rotation, at the
        // cost of residual error.
        let p = points();
        let q: Vec<Vec3> = p.iter().map(|x| Vec3::new(-x.x, x.y, x.z)).collect();
        let s = kabsch(&p, &q);
        assert_proper_rotation(&s.transform.u);
        assert!(s.msd > 0.0);
    }
}
