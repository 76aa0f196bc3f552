//! Entity synonym resolution
//!
//! Maps entity values produced by an upstream extractor to canonical values:
//! exact synonyms first, then a fuzzy fallback over Vietnamese
//! diacritic-insensitive text.
//!
//! # Architecture
//!
//! ```text
//! training pairs ──► SynonymTable ──finalize()──► ReverseIndex
//!                         │                            │
//!                         │ exact lookup               ▼
//!                         │                     CandidateRanker
//!                         │                  (normalize + ratio)
//!                         ▼                            │
//!                    policy::resolve ◄─────────────────┘
//!                         │
//!                         ▼
//!           ExactMatch | FuzzyAccepted | FuzzyRejected
//! ```

pub mod normalize;
pub mod policy;
pub mod ranker;
pub mod similarity;
pub mod table;

pub use normalize::{normalize, table_key};
pub use policy::{resolve, select_candidates, Outcome, Resolution};
pub use ranker::{Candidate, CandidateRanker};
pub use similarity::{partial_ratio, ratio};
pub use table::{AddOutcome, AnchorGroup, ReverseIndex, SynonymConflict, SynonymTable};
