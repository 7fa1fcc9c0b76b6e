use std::time::{Duration, Instant};

use axum::{Json, extract::State};
use sm_common::MatchConfig;
use sm_common::api::{
    JobsForStudentRequest, JobsForStudentResponse, RankingWeights, StudentsForJobRequest,
    StudentsForJobResponse,
};
use sm_common::matching::{MatchRanker, RankedMatches, WeightVector};
use tracing::info;

use crate::SharedState;
use crate::error::ApiError;

fn check_candidate_count(count: usize, config: &MatchConfig) -> Result<(), ApiError> {
    if count > config.max_candidates {
        return Err(ApiError::BadRequest(format!(
            "at most {} candidates are accepted per request (got {count})",
            config.max_candidates
        )));
    }
    Ok(())
}

fn resolve_min_similarity(requested: Option<f64>, config: &MatchConfig) -> Result<f64, ApiError> {
    match requested {
        None => Ok(config.default_min_similarity),
        Some(value) if (0.0..=1.0).contains(&value) => Ok(value),
        Some(value) => Err(ApiError::BadRequest(format!(
            "min_similarity_score must be between 0 and 1 (got {value})"
        ))),
    }
}

fn resolve_weights(requested: Option<RankingWeights>) -> Result<WeightVector, ApiError> {
    let Some(weights) = requested else {
        return Ok(WeightVector::default());
    };

    if let Some(field) = weights.first_above_one() {
        return Err(ApiError::BadRequest(format!(
            "ranking_weights.{field} must not exceed 1"
        )));
    }

    Ok(weights.into())
}

/// Counts reported for every ranking call, whichever endpoint served it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RankingOutcome {
    total_candidates: usize,
    eligible: usize,
    scored: usize,
    skipped: usize,
    returned: usize,
    top_k: usize,
}

impl RankingOutcome {
    fn new(total_candidates: usize, eligible: usize, ranked: &RankedMatches, top_k: usize) -> Self {
        Self {
            total_candidates,
            eligible,
            scored: ranked.scored,
            skipped: ranked.skipped.len(),
            returned: ranked.matches.len(),
            top_k,
        }
    }

    fn report(&self, endpoint: &'static str, subject_id: &str, elapsed: Duration) {
        sm_metrics::record_ranking(endpoint, self.scored, self.skipped, elapsed);

        info!(
            endpoint,
            subject_id,
            total_candidates = self.total_candidates,
            eligible = self.eligible,
            skipped = self.skipped,
            returned = self.returned,
            top_k = self.top_k,
            elapsed_ms = elapsed.as_millis() as u64,
            "ranking served"
        );
    }
}

pub async fn students_for_job(
    State(state): State<SharedState>,
    Json(request): Json<StudentsForJobRequest>,
) -> Result<Json<StudentsForJobResponse>, ApiError> {
    let config = &state.match_config;
    check_candidate_count(request.candidates.len(), config)?;
    let min_similarity = resolve_min_similarity(request.min_similarity_score, config)?;
    let weights = resolve_weights(request.ranking_weights)?;
    let top_k = config.resolve_top_k(request.top_k, config.students_default_top_k);

    let candidates = request.candidates_above(min_similarity);
    let started = Instant::now();
    let ranked = MatchRanker::new().rank(&candidates, weights, top_k)?;
    RankingOutcome::new(request.candidates.len(), candidates.len(), &ranked, top_k).report(
        "students_for_job",
        &request.job.id,
        started.elapsed(),
    );

    Ok(Json(StudentsForJobResponse::new(
        request.job.id.clone(),
        request.job.title.clone(),
        &ranked.matches,
        request.candidates.len(),
    )))
}

pub async fn jobs_for_student(
    State(state): State<SharedState>,
    Json(request): Json<JobsForStudentRequest>,
) -> Result<Json<JobsForStudentResponse>, ApiError> {
    let config = &state.match_config;
    check_candidate_count(request.candidates.len(), config)?;
    let min_similarity = resolve_min_similarity(request.min_similarity_score, config)?;
    let weights = resolve_weights(request.ranking_weights)?;
    let top_k = config.resolve_top_k(request.top_k, config.jobs_default_top_k);

    let candidates = request.candidates_above(min_similarity);
    let started = Instant::now();
    let ranked = MatchRanker::new().rank(&candidates, weights, top_k)?;
    RankingOutcome::new(request.candidates.len(), candidates.len(), &ranked, top_k).report(
        "jobs_for_student",
        &request.student.id,
        started.elapsed(),
    );

    Ok(Json(JobsForStudentResponse::new(
        request.student.id.clone(),
        &ranked.matches,
        request.candidates.len(),
    )))
}
