//! Secondary-structure assignment from Cα geometry alone: a fixed distance
//! test over a five-residue window, then smoothing of the label string.

use tm_types::{dist2, Vec3};

/// Per-residue secondary-structure label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Sec {
    #[default]
    Coil,
    Helix,
    Turn,
    Strand,
}

// Canonical Cα-Cα distances for the window pairs
// (1,3) (1,4) (1,5) (2,4) (2,5) (3,5), helix and strand.
const HELIX_DIST: [f64; 6] = [5.45, 5.18, 6.37, 5.45, 5.18, 5.45];
const HELIX_TOL: f64 = 2.1;
const STRAND_DIST: [f64; 6] = [6.1, 10.4, 13.0, 6.1, 10.4, 6.1];
const STRAND_TOL: f64 = 1.42;

fn classify(d: [f64; 6]) -> Sec {
    if d.iter()
        .zip(&HELIX_DIST)
        .all(|(x, c)| (x - c).abs() < HELIX_TOL)
    {
        return Sec::Helix;
    }
    if d.iter()
        .zip(&STRAND_DIST)
        .all(|(x, c)| (x - c).abs() < STRAND_TOL)
    {
        return Sec::Strand;
    }
    // d[2] is the (i-2, i+2) span.
    if d[2] < 8.0 {
        return Sec::Turn;
    }
    Sec::Coil
}

/// Assign a label to every residue and smooth the result. Residues without
/// two neighbors on each side are coil.
pub fn make_sec(coords: &[Vec3], sec: &mut [Sec]) {
    assert_eq!(coords.len(), sec.len());
    let len = coords.len();
    for i in 0..len {
        sec[i] = Sec::Coil;
        if i >= 2 && i + 2 < len {
            let w = [
                dist2(&coords[i - 2], &coords[i]).sqrt(),
                dist2(&coords[i - 2], &coords[i + 1]).sqrt(),
                dist2(&coords[i - 2], &coords[i + 2]).sqrt(),
                dist2(&coords[i - 1], &coords[i + 1]).sqrt(),
                dist2(&coords[i - 1], &coords[i + 2]).sqrt(),
                dist2(&coords[i], &coords[i + 2]).sqrt(),
            ];
            sec[i] = classify(w);
        }
    }
    smooth(sec);
}

/// Three smoothing passes over helix and strand labels: isolated singletons
/// become coil, isolated pairs become coil, and a lone mismatch between two
/// matching neighbors adopts their label.
pub fn smooth(sec: &mut [Sec]) {
    let len = sec.len();

    // --x-- => -----
    for i in 2..len.saturating_sub(2) {
        let j = sec[i];
        if j == Sec::Helix || j == Sec::Strand {
            if sec[i - 2] != j && sec[i - 1] != j && sec[i + 1] != j && sec[i + 2] != j {
                sec[i] = Sec::Coil;
            }
        }
    }

    // --xx-- => ------
    for i in 0..len.saturating_sub(5) {
        for j in [Sec::Helix, Sec::Strand] {
            if sec[i] != j
                && sec[i + 1] != j
                && sec[i + 2] == j
                && sec[i + 3] == j
                && sec[i + 4] != j
                && sec[i + 5] != j
            {
                sec[i + 2] = Sec::Coil;
                sec[i + 3] = Sec::Coil;
            }
        }
    }

    // x-x => xxx
    for i in 0..len.saturating_sub(2) {
        let j = sec[i];
        if (j == Sec::Helix || j == Sec::Strand) && sec[i + 1] != j && sec[i + 2] == j {
            sec[i + 1] = j;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ideal α-helix: 1.5 Å rise, 100° twist, 2.3 Å radius.
    fn helix(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let a = (i as f64) * 100f64.to_radians();
                Vec3::new(2.3 * a.cos(), 2.3 * a.sin(), 1.5 * i as f64)
            })
            .collect()
    }

    #[test]
    fn helix_is_labelled_helix() {
        let c = helix(20);
        let mut sec = vec![Sec::Coil; c.len()];
        make_sec(&c, &mut sec);
        for (i, &s) in sec.iter().enumerate() {
            if i >= 2 && i + 2 < c.len() {
                assert_eq!(s, Sec::Helix, "residue {i}");
            } else {
                assert_eq!(s, Sec::Coil, "boundary residue {i}");
            }
        }
    }

    #[test]
    fn extended_chain_is_not_helix() {
        // Fully extended strand-like geometry: ~3.5 Å per residue.
        let c: Vec<Vec3> = (0..20).map(|i| Vec3::new(3.5 * i as f64, 0.0, 0.0)).collect();
        let mut sec = vec![Sec::Coil; c.len()];
        make_sec(&c, &mut sec);
        assert!(sec.iter().all(|&s| s != Sec::Helix));
    }

    #[test]
    fn singleton_labels_are_smoothed_away() {
        let mut sec = vec![Sec::Coil; 9];
        sec[4] = Sec::Helix;
        smooth(&mut sec);
        assert!(sec.iter().all(|&s| s == Sec::Coil));
    }

    #[test]
    fn bridging_fills_single_gaps() {
        let mut sec = vec![
            Sec::Helix,
            Sec::Helix,
            Sec::Helix,
            Sec::Coil,
            Sec::Helix,
            Sec::Helix,
            Sec::Helix,
        ];
        smooth(&mut sec);
        assert!(sec.iter().all(|&s| s == Sec::Helix));
    }
}
