pub mod insights;
pub mod pipeline;
pub mod scoring;
pub mod skills;
pub mod summary;
pub mod weights;

pub use pipeline::{
    CandidateError, CandidateMetadata, MatchCandidate, MatchRanker, RankedMatches, ScoredMatch,
    rank,
};
pub use skills::{CoverageBreakdown, SkillsBreakdown, compute_breakdown};
pub use weights::{DEFAULT_WEIGHTS, WeightError, WeightVector, normalize_weights};
