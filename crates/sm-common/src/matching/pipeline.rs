use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{
    scoring::{clamp_unit, combine_scores},
    skills::{SkillsBreakdown, compute_breakdown},
    summary::summarize,
    weights::{WeightError, WeightVector},
};

/// Display data carried alongside a candidate and returned untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub company_id: Option<String>,
}

/// One similarity-search hit plus the skill data needed to re-rank it.
///
/// `skills` is the candidate side of the comparison (a student's skills);
/// `required_skills` / `preferred_skills` are the posting side. `None` skills
/// means the candidate's skill record could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub id: String,
    pub raw_similarity: f64,
    pub skills: Option<Vec<String>>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub metadata: CandidateMetadata,
}

impl MatchCandidate {
    pub fn new(id: impl Into<String>, raw_similarity: f64, skills: Vec<String>) -> Self {
        Self {
            id: id.into(),
            raw_similarity,
            skills: Some(skills),
            required_skills: Vec::new(),
            preferred_skills: Vec::new(),
            metadata: CandidateMetadata::default(),
        }
    }

    pub fn with_requirements(mut self, required: Vec<String>, preferred: Vec<String>) -> Self {
        self.required_skills = required;
        self.preferred_skills = preferred;
        self
    }

    pub fn with_metadata(mut self, metadata: CandidateMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Ranked result with its full score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub id: String,
    /// Similarity after clamping into `[0, 1]`.
    pub raw_similarity: f64,
    pub required_coverage: f64,
    pub preferred_coverage: f64,
    pub final_score: f64,
    /// 1-based position after the full sort (assigned before truncation).
    pub rank: usize,
    pub summary: String,
    pub skills: SkillsBreakdown,
    pub metadata: CandidateMetadata,
    /// Opaque slot for a richer explanation supplied by an external insight
    /// generator. Never filled by the ranker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<serde_json::Value>,
}

/// Why a single candidate was left out of a ranking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandidateError {
    #[error("candidate at position {position} has an empty id")]
    MissingId { position: usize },
    #[error("candidate {id} has no skill data")]
    MissingSkills { id: String },
    #[error("candidate {id} has a non-finite similarity score")]
    InvalidSimilarity { id: String },
}

/// Outcome of one ranking pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedMatches {
    /// Top-K, sorted by `final_score` descending.
    pub matches: Vec<ScoredMatch>,
    /// Candidates dropped because their data was unusable.
    pub skipped: Vec<CandidateError>,
    /// Number of candidates that were scored (before truncation).
    pub scored: usize,
}

/// Stateless re-ranker: coverage → combined score → summary → stable sort → top-K.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchRanker;

impl MatchRanker {
    pub fn new() -> Self {
        Self
    }

    /// Rank `candidates` under `weights` and keep the first `top_k`.
    ///
    /// Weights are validated before any per-candidate work; a bad weight
    /// fails the whole call. A bad candidate only removes that candidate.
    pub fn rank(
        &self,
        candidates: &[MatchCandidate],
        weights: WeightVector,
        top_k: usize,
    ) -> Result<RankedMatches, WeightError> {
        let weights = weights.normalized()?;

        if top_k == 0 || candidates.is_empty() {
            return Ok(RankedMatches::default());
        }

        let mut skipped = Vec::new();
        let mut scored = Vec::with_capacity(candidates.len());

        for (position, candidate) in candidates.iter().enumerate() {
            match self.score_candidate(position, candidate, &weights) {
                Ok(scored_match) => scored.push(scored_match),
                Err(err) => {
                    warn!(error = %err, position, "skipping candidate with unusable data");
                    skipped.push(err);
                }
            }
        }

        // `sort_by` is stable: equal scores keep their search order.
        scored.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });

        for (index, scored_match) in scored.iter_mut().enumerate() {
            scored_match.rank = index + 1;
        }

        let scored_count = scored.len();
        scored.truncate(top_k);

        debug!(
            candidates = candidates.len(),
            scored = scored_count,
            skipped = skipped.len(),
            returned = scored.len(),
            top_k,
            "ranking complete"
        );

        Ok(RankedMatches {
            matches: scored,
            skipped,
            scored: scored_count,
        })
    }

    fn score_candidate(
        &self,
        position: usize,
        candidate: &MatchCandidate,
        weights: &WeightVector,
    ) -> Result<ScoredMatch, CandidateError> {
        if candidate.id.trim().is_empty() {
            return Err(CandidateError::MissingId { position });
        }

        let Some(skills) = candidate.skills.as_deref() else {
            return Err(CandidateError::MissingSkills {
                id: candidate.id.clone(),
            });
        };

        if !candidate.raw_similarity.is_finite() {
            return Err(CandidateError::InvalidSimilarity {
                id: candidate.id.clone(),
            });
        }

        let raw_similarity = clamp_unit(candidate.raw_similarity);
        let breakdown = compute_breakdown(
            skills,
            &candidate.required_skills,
            &candidate.preferred_skills,
        );
        let required_coverage = breakdown.required.coverage;
        let preferred_coverage = breakdown.preferred.coverage;

        let final_score =
            combine_scores(raw_similarity, required_coverage, preferred_coverage, weights);
        let summary = summarize(raw_similarity, &breakdown, final_score);

        Ok(ScoredMatch {
            id: candidate.id.clone(),
            raw_similarity,
            required_coverage,
            preferred_coverage,
            final_score,
            rank: 0,
            summary,
            skills: breakdown,
            metadata: candidate.metadata.clone(),
            attachment: None,
        })
    }
}

/// Convenience wrapper returning only the ranked list.
pub fn rank(
    candidates: &[MatchCandidate],
    weights: WeightVector,
    top_k: usize,
) -> Result<Vec<ScoredMatch>, WeightError> {
    MatchRanker::new()
        .rank(candidates, weights, top_k)
        .map(|ranked| ranked.matches)
}
