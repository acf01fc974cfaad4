//! Scratch storage for one alignment run. Everything the algorithms write
//! into lives here and is handed around by mutable reference; nothing is
//! process-wide.

use std::ops::{Index, IndexMut};

use crate::prelude::*;

/// A flat row-major matrix with fixed column count.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            cols,
            data: vec![T::default(); rows * cols],
        }
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.data[i * self.cols + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.data[i * self.cols + j]
    }
}

/// Working buffers for one run, sized to the two input lengths.
///
/// `r1`/`r2` stage Kabsch inputs, `xtm`/`ytm` hold the coordinates of the
/// currently aligned pairs, `xt` holds transformed X coordinates. The DP
/// matrices are `(|X|+1) × (|Y|+1)`.
pub struct WorkArena {
    pub r1: Vec<Vec3>,
    pub r2: Vec<Vec3>,
    pub xtm: Vec<Vec3>,
    pub ytm: Vec<Vec3>,
    pub xt: Vec<Vec3>,

    pub score: Grid<f64>,
    pub path: Grid<bool>,
    pub val: Grid<f64>,

    pub secx: Vec<Sec>,
    pub secy: Vec<Sec>,

    /// Selected-pair indices from the scoring kernel.
    pub i_ali: Vec<usize>,
    /// Previous selection, for the convergence test in the score search.
    pub k_ali: Vec<usize>,
    /// Per-pair squared distances for the fast evaluator.
    pub dis: Vec<f64>,
}

impl WorkArena {
    pub fn new(xlen: usize, ylen: usize) -> Self {
        let minlen = min(xlen, ylen);
        WorkArena {
            r1: vec![Vec3::zeros(); minlen],
            r2: vec![Vec3::zeros(); minlen],
            xtm: vec![Vec3::zeros(); minlen],
            ytm: vec![Vec3::zeros(); minlen],
            xt: vec![Vec3::zeros(); xlen],
            score: Grid::new(xlen + 1, ylen + 1),
            path: Grid::new(xlen + 1, ylen + 1),
            val: Grid::new(xlen + 1, ylen + 1),
            secx: vec![Sec::Coil; xlen],
            secy: vec![Sec::Coil; ylen],
            i_ali: Vec::with_capacity(minlen),
            k_ali: Vec::with_capacity(minlen),
            dis: vec![0.0; minlen],
        }
    }

    /// Copy the aligned pairs of `map` into `xtm`/`ytm`; returns the pair
    /// count.
    pub fn stage_pairs(&mut self, x: &[Vec3], y: &[Vec3], map: &Alignment) -> usize {
        let mut k = 0;
        for (i, j) in map.pairs() {
            self.xtm[k] = x[i];
            self.ytm[k] = y[j];
            k += 1;
        }
        k
    }
}
