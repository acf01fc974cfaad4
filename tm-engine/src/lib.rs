//! The TM-score alignment search engine.
//!
//! [`align`] is the entry point: it generates seed alignments by several
//! independent heuristics, refines each by alternating distance-driven
//! dynamic programming with rigid-body refitting, and reports the transform
//! and alignment with the highest TM-score, scored under every requested
//! length normalization.

mod arena;
mod dp;
mod driver;
mod error;
mod fast_score;
mod refine;
mod search;
mod seeds;

pub use arena::{Grid, WorkArena};
pub use driver::{align, AlignOptions, AlignResult, SeedAlignment, SeedMode, SeedScore};
pub use error::AlignError;
pub use fast_score::get_score_fast;
pub use refine::dp_iter;
pub use search::{detailed_search, tmscore8_search, SearchResult};
pub use seeds::{get_initial, get_initial5, get_initial_fgt, get_initial_ss, get_initial_ssplus};

mod prelude {
    pub use std::cmp::{max, min};
    pub use tm_kernel::Sec;
    pub use tm_types::*;
}
