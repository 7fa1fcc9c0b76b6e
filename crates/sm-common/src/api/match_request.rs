use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::matching::{CandidateMetadata, MatchCandidate, WeightVector};

/// Weight sliders as supplied by a caller. Omitted fields take the default
/// for that component; normalization happens in the ranking core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    #[serde(default = "default_similarity_weight")]
    pub similarity: f64,
    #[serde(default = "default_required_weight")]
    pub required_skills: f64,
    #[serde(default = "default_preferred_weight")]
    pub preferred_skills: f64,
}

fn default_similarity_weight() -> f64 {
    crate::matching::DEFAULT_WEIGHTS.similarity
}

fn default_required_weight() -> f64 {
    crate::matching::DEFAULT_WEIGHTS.required_skills
}

fn default_preferred_weight() -> f64 {
    crate::matching::DEFAULT_WEIGHTS.preferred_skills
}

impl RankingWeights {
    /// Name of the first component above 1.0, if any. Negative values are
    /// left for the core's weight validation to reject.
    pub fn first_above_one(&self) -> Option<&'static str> {
        [
            ("similarity", self.similarity),
            ("required_skills", self.required_skills),
            ("preferred_skills", self.preferred_skills),
        ]
        .into_iter()
        .find(|(_, value)| *value > 1.0)
        .map(|(field, _)| field)
    }
}

impl From<RankingWeights> for WeightVector {
    fn from(value: RankingWeights) -> Self {
        WeightVector::new(
            value.similarity,
            value.required_skills,
            value.preferred_skills,
        )
    }
}

/// Accepts any JSON for a skill list. Arrays keep only their string elements;
/// anything else (null, object, number) yields `None`.
fn lenient_skill_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(skill) => Some(skill),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Like [`lenient_skill_list`] but malformed input becomes an empty list.
fn lenient_skill_list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_skill_list(deserializer).map(Option::unwrap_or_default)
}

/// Posting side of students-for-job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPayload {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_skill_list_or_empty")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_skill_list_or_empty")]
    pub preferred_skills: Vec<String>,
}

/// Similarity-search hit for a student. `skills` is `None` when the profile
/// record was missing or malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentCandidate {
    pub id: String,
    pub similarity: f64,
    #[serde(default, deserialize_with = "lenient_skill_list")]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudentsForJobRequest {
    pub job: JobPayload,
    #[serde(default)]
    pub candidates: Vec<StudentCandidate>,
    #[serde(default)]
    pub top_k: Option<i64>,
    #[serde(default)]
    pub min_similarity_score: Option<f64>,
    #[serde(default)]
    pub ranking_weights: Option<RankingWeights>,
}

impl StudentsForJobRequest {
    /// Candidates at or above `min_similarity`, in search order, paired with
    /// the job's skill lists.
    pub fn candidates_above(&self, min_similarity: f64) -> Vec<MatchCandidate> {
        self.candidates
            .iter()
            .filter(|student| student.similarity >= min_similarity)
            .map(|student| MatchCandidate {
                id: student.id.clone(),
                raw_similarity: student.similarity,
                skills: student.skills.clone(),
                required_skills: self.job.required_skills.clone(),
                preferred_skills: self.job.preferred_skills.clone(),
                metadata: CandidateMetadata::default(),
            })
            .collect()
    }
}

/// Candidate side of jobs-for-student.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentPayload {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_skill_list_or_empty")]
    pub skills: Vec<String>,
}

/// Similarity-search hit for a job posting.
#[derive(Debug, Clone, Deserialize)]
pub struct JobCandidate {
    pub id: String,
    pub similarity: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_skill_list_or_empty")]
    pub required_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_skill_list_or_empty")]
    pub preferred_skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsForStudentRequest {
    pub student: StudentPayload,
    #[serde(default)]
    pub candidates: Vec<JobCandidate>,
    /// Restrict results to these companies (case-insensitive).
    #[serde(default)]
    pub company_ids: Option<Vec<String>>,
    #[serde(default)]
    pub top_k: Option<i64>,
    #[serde(default)]
    pub min_similarity_score: Option<f64>,
    #[serde(default)]
    pub ranking_weights: Option<RankingWeights>,
}

impl JobsForStudentRequest {
    fn company_allowed(&self, job: &JobCandidate) -> bool {
        let Some(company_ids) = self.company_ids.as_deref().filter(|ids| !ids.is_empty()) else {
            return true;
        };

        let company = job.company_id.as_deref().unwrap_or("").to_lowercase();
        company_ids.iter().any(|id| id.to_lowercase() == company)
    }

    /// Job candidates at or above `min_similarity` that pass the company
    /// filter, each compared against the student's skills.
    pub fn candidates_above(&self, min_similarity: f64) -> Vec<MatchCandidate> {
        self.candidates
            .iter()
            .filter(|job| job.similarity >= min_similarity)
            .filter(|job| self.company_allowed(job))
            .map(|job| MatchCandidate {
                id: job.id.clone(),
                raw_similarity: job.similarity,
                skills: Some(self.student.skills.clone()),
                required_skills: job.required_skills.clone(),
                preferred_skills: job.preferred_skills.clone(),
                metadata: CandidateMetadata {
                    title: job.title.clone(),
                    company_name: job.company_name.clone(),
                    company_id: job.company_id.clone(),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_weights_fill_in_defaults() {
        let weights: RankingWeights =
            serde_json::from_value(json!({ "similarity": 1.0 })).unwrap();

        assert_eq!(
            WeightVector::from(weights),
            WeightVector::new(1.0, 0.3, 0.1)
        );
    }

    #[test]
    fn flags_weights_above_one() {
        let weights = RankingWeights {
            similarity: 0.5,
            required_skills: 1.2,
            preferred_skills: 0.0,
        };

        assert_eq!(weights.first_above_one(), Some("required_skills"));
        assert_eq!(
            RankingWeights {
                required_skills: -0.2,
                ..weights
            }
            .first_above_one(),
            None
        );
    }

    #[test]
    fn skill_lists_are_parsed_leniently() {
        let request: StudentsForJobRequest = serde_json::from_value(json!({
            "job": {
                "id": "job-1",
                "required_skills": ["Python", null, 42, "Docker"],
                "preferred_skills": "AWS"
            },
            "candidates": [
                { "id": "s1", "similarity": 0.8, "skills": ["python", { "x": 1 }] },
                { "id": "s2", "similarity": 0.9, "skills": null },
                { "id": "s3", "similarity": 0.85 },
                { "id": "s4", "similarity": 0.75, "skills": "python" }
            ]
        }))
        .unwrap();

        assert_eq!(request.job.required_skills, vec!["Python", "Docker"]);
        assert!(request.job.preferred_skills.is_empty());
        assert_eq!(request.candidates[0].skills, Some(vec!["python".to_string()]));
        assert_eq!(request.candidates[1].skills, None);
        assert_eq!(request.candidates[2].skills, None);
        assert_eq!(request.candidates[3].skills, None);
    }

    #[test]
    fn students_below_threshold_are_dropped_in_order() {
        let request: StudentsForJobRequest = serde_json::from_value(json!({
            "job": { "id": "job-1", "required_skills": ["rust"] },
            "candidates": [
                { "id": "a", "similarity": 0.72, "skills": [] },
                { "id": "b", "similarity": 0.69, "skills": [] },
                { "id": "c", "similarity": 0.70, "skills": [] }
            ]
        }))
        .unwrap();

        let candidates = request.candidates_above(0.70);

        let ids: Vec<_> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(candidates[0].required_skills, vec!["rust"]);
    }

    #[test]
    fn jobs_filter_by_company_case_insensitively() {
        let request: JobsForStudentRequest = serde_json::from_value(json!({
            "student": { "id": "stu-1", "skills": ["Rust"] },
            "company_ids": ["ACME"],
            "candidates": [
                { "id": "j1", "similarity": 0.9, "company_id": "acme", "title": "Backend" },
                { "id": "j2", "similarity": 0.9, "company_id": "globex" },
                { "id": "j3", "similarity": 0.9 }
            ]
        }))
        .unwrap();

        let candidates = request.candidates_above(0.7);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "j1");
        assert_eq!(candidates[0].skills, Some(vec!["Rust".to_string()]));
        assert_eq!(candidates[0].metadata.title.as_deref(), Some("Backend"));
    }

    #[test]
    fn empty_company_filter_keeps_everything() {
        let request: JobsForStudentRequest = serde_json::from_value(json!({
            "student": { "id": "stu-1" },
            "company_ids": [],
            "candidates": [
                { "id": "j1", "similarity": 0.9 },
                { "id": "j2", "similarity": 0.8, "company_id": "globex" }
            ]
        }))
        .unwrap();

        assert_eq!(request.candidates_above(0.7).len(), 2);
        assert!(request.student.skills.is_empty());
    }
}
