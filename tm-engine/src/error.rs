use thiserror::Error;

/// Failures surfaced by the alignment driver. Numerical trouble inside the
/// kernels is not an error; degenerate candidates simply lose on score.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    /// The shorter structure has too few residues to seed an alignment.
    #[error("structure too short to align ({len} residues; need more than 5)")]
    StructureTooShort { len: usize },

    /// Every seed generator came back empty.
    #[error("no alignment between the two structures")]
    NoAlignment,
}
