//! Pure geometric kernels: optimal superposition, distance-based scoring and
//! secondary-structure assignment. No state, no buffers owned here.

mod kabsch;
pub mod score;
pub mod sec;

pub use kabsch::{kabsch, Superposition};
pub use score::{score_fun8, ScoreNorm, ScoreSum};
pub use sec::Sec;
