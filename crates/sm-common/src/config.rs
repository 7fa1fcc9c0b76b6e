use std::env;
use std::str::FromStr;

/// Request defaults and bounds for the matching endpoints (read from the environment).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// `top_k` used by students-for-job when the request omits it.
    pub students_default_top_k: usize,
    /// `top_k` used by jobs-for-student when the request omits it.
    pub jobs_default_top_k: usize,
    /// Larger `top_k` values are clamped to this.
    pub max_top_k: usize,
    /// Similarity threshold applied when the request omits it.
    pub default_min_similarity: f64,
    /// Upper bound on candidates accepted per request.
    pub max_candidates: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            students_default_top_k: 10,
            jobs_default_top_k: 5,
            max_top_k: 50,
            default_min_similarity: 0.70,
            max_candidates: 100,
        }
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}

impl MatchConfig {
    /// Read overrides from `SM_*` variables, keeping defaults for anything
    /// unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_top_k = parse_env::<usize>("SM_MAX_TOP_K")
            .filter(|value| *value > 0)
            .unwrap_or(defaults.max_top_k);

        Self {
            students_default_top_k: parse_env::<usize>("SM_STUDENTS_DEFAULT_TOP_K")
                .unwrap_or(defaults.students_default_top_k)
                .min(max_top_k),
            jobs_default_top_k: parse_env::<usize>("SM_JOBS_DEFAULT_TOP_K")
                .unwrap_or(defaults.jobs_default_top_k)
                .min(max_top_k),
            max_top_k,
            default_min_similarity: parse_env::<f64>("SM_MIN_SIMILARITY")
                .filter(|value| (0.0..=1.0).contains(value))
                .unwrap_or(defaults.default_min_similarity),
            max_candidates: parse_env::<usize>("SM_MAX_CANDIDATES")
                .filter(|value| *value > 0)
                .unwrap_or(defaults.max_candidates),
        }
    }

    /// Resolve a requested `top_k`: missing → `default`, non-positive → 0,
    /// oversized → `max_top_k`.
    pub fn resolve_top_k(&self, requested: Option<i64>, default: usize) -> usize {
        match requested {
            None => default.min(self.max_top_k),
            Some(value) if value <= 0 => 0,
            Some(value) => usize::try_from(value)
                .unwrap_or(usize::MAX)
                .min(self.max_top_k),
        }
    }
}
