use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::{ScoredMatch, SkillsBreakdown, insights};
use crate::run_id::RunStamp;

/// Flattened skill coverage for API consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsBreakdownDto {
    pub required_skills_matched: Vec<String>,
    pub required_skills_missing: Vec<String>,
    pub preferred_skills_matched: Vec<String>,
    pub preferred_skills_missing: Vec<String>,
    pub required_matched_count: usize,
    pub required_total_count: usize,
    pub preferred_matched_count: usize,
    pub preferred_total_count: usize,
    pub required_coverage: f64,
    pub preferred_coverage: f64,
}

impl From<&SkillsBreakdown> for SkillsBreakdownDto {
    fn from(value: &SkillsBreakdown) -> Self {
        Self {
            required_skills_matched: value.required.matched_list(),
            required_skills_missing: value.required.missing_list(),
            preferred_skills_matched: value.preferred.matched_list(),
            preferred_skills_missing: value.preferred.missing_list(),
            required_matched_count: value.required.matched_count,
            required_total_count: value.required.total_count,
            preferred_matched_count: value.preferred.matched_count,
            preferred_total_count: value.preferred.total_count,
            required_coverage: value.required.coverage,
            preferred_coverage: value.preferred.coverage,
        }
    }
}

/// `note` is only set for rule-based insights.
fn note_for(scored: &ScoredMatch) -> Option<String> {
    scored
        .attachment
        .is_none()
        .then(|| insights::similarity_note(scored.raw_similarity))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentMatchInsights {
    pub ai_powered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub summary: String,
    pub skill_overlap: Vec<String>,
    pub missing_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentMatch {
    pub student_id: String,
    pub similarity_score: f64,
    pub rank: usize,
    pub final_score: f64,
    pub required_skill_score: f64,
    pub preferred_skill_score: f64,
    pub summary: String,
    pub skills_breakdown: SkillsBreakdownDto,
    pub match_insights: StudentMatchInsights,
}

impl From<&ScoredMatch> for StudentMatch {
    fn from(scored: &ScoredMatch) -> Self {
        Self {
            student_id: scored.id.clone(),
            similarity_score: scored.raw_similarity,
            rank: scored.rank,
            final_score: scored.final_score,
            required_skill_score: scored.required_coverage,
            preferred_skill_score: scored.preferred_coverage,
            summary: scored.summary.clone(),
            skills_breakdown: SkillsBreakdownDto::from(&scored.skills),
            match_insights: StudentMatchInsights {
                ai_powered: scored.attachment.is_some(),
                note: note_for(scored),
                summary: scored.summary.clone(),
                skill_overlap: insights::skill_overlap(&scored.skills),
                missing_skills: insights::missing_skills(&scored.skills),
                attachment: scored.attachment.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentsForJobResponse {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub matches: Vec<StudentMatch>,
    /// Candidates received, before the similarity threshold.
    pub total_candidates: usize,
    pub returned_count: usize,
    pub match_run_id: String,
    pub matched_at: DateTime<Utc>,
}

impl StudentsForJobResponse {
    pub fn new(
        job_id: impl Into<String>,
        job_title: Option<String>,
        matches: &[ScoredMatch],
        total_candidates: usize,
    ) -> Self {
        let matches: Vec<StudentMatch> = matches.iter().map(StudentMatch::from).collect();
        let stamp = RunStamp::now();
        Self {
            job_id: job_id.into(),
            job_title,
            returned_count: matches.len(),
            matches,
            total_candidates,
            match_run_id: stamp.match_run_id,
            matched_at: stamp.matched_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatchInsights {
    pub ai_powered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub summary: String,
    pub skill_strengths: Vec<String>,
    pub growth_opportunities: Vec<String>,
    pub recommended_because: Vec<String>,
    pub development_areas: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub job_id: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub company_id: Option<String>,
    pub similarity_score: f64,
    pub rank: usize,
    pub final_score: f64,
    pub required_skill_score: f64,
    pub preferred_skill_score: f64,
    pub summary: String,
    pub skills_breakdown: SkillsBreakdownDto,
    pub match_insights: JobMatchInsights,
}

impl From<&ScoredMatch> for JobMatch {
    fn from(scored: &ScoredMatch) -> Self {
        Self {
            job_id: scored.id.clone(),
            job_title: scored.metadata.title.clone(),
            company_name: scored.metadata.company_name.clone(),
            company_id: scored.metadata.company_id.clone(),
            similarity_score: scored.raw_similarity,
            rank: scored.rank,
            final_score: scored.final_score,
            required_skill_score: scored.required_coverage,
            preferred_skill_score: scored.preferred_coverage,
            summary: scored.summary.clone(),
            skills_breakdown: SkillsBreakdownDto::from(&scored.skills),
            match_insights: JobMatchInsights {
                ai_powered: scored.attachment.is_some(),
                note: note_for(scored),
                summary: scored.summary.clone(),
                skill_strengths: insights::skill_strengths(&scored.skills),
                growth_opportunities: insights::growth_opportunities(&scored.skills),
                recommended_because: insights::recommended_because(&scored.skills),
                development_areas: insights::development_areas(&scored.skills),
                attachment: scored.attachment.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobsForStudentResponse {
    pub student_id: String,
    pub matches: Vec<JobMatch>,
    pub total_candidates: usize,
    pub returned_count: usize,
    pub match_run_id: String,
    pub matched_at: DateTime<Utc>,
}

impl JobsForStudentResponse {
    pub fn new(
        student_id: impl Into<String>,
        matches: &[ScoredMatch],
        total_candidates: usize,
    ) -> Self {
        let matches: Vec<JobMatch> = matches.iter().map(JobMatch::from).collect();
        let stamp = RunStamp::now();
        Self {
            student_id: student_id.into(),
            returned_count: matches.len(),
            matches,
            total_candidates,
            match_run_id: stamp.match_run_id,
            matched_at: stamp.matched_at,
        }
    }
}
