use crate::Vec3;

/// An ordered list of residues, each with a Cα coordinate, a one-letter
/// identity and the residue number from the input (not necessarily
/// contiguous). Immutable after construction.
#[derive(Clone, Debug)]
pub struct Structure {
    coords: Vec<Vec3>,
    seq: Vec<u8>,
    resno: Vec<i32>,
}

impl Structure {
    /// Panics if the three lists differ in length.
    pub fn new(coords: Vec<Vec3>, seq: Vec<u8>, resno: Vec<i32>) -> Self {
        assert_eq!(coords.len(), seq.len());
        assert_eq!(coords.len(), resno.len());
        Structure { coords, seq, resno }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[inline]
    pub fn coords(&self) -> &[Vec3] {
        &self.coords
    }

    #[inline]
    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    #[inline]
    pub fn resno(&self) -> &[i32] {
        &self.resno
    }
}
