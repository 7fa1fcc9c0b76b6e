use serde::{Deserialize, Serialize};

use crate::skill_normalizer::{SkillSet, to_skill_set};

/// Coverage of one reference skill list (required or preferred) by a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageBreakdown {
    pub matched: SkillSet,
    pub missing: SkillSet,
    pub matched_count: usize,
    pub total_count: usize,
    /// `matched_count / total_count`, or `0.0` when nothing is listed.
    pub coverage: f64,
}

impl CoverageBreakdown {
    /// Set intersection / difference of `reference` against `candidate`.
    ///
    /// An empty reference is neutral: coverage `0.0`, not a penalty and not a
    /// perfect score.
    pub fn between(candidate: &SkillSet, reference: &SkillSet) -> Self {
        let matched: SkillSet = reference.intersection(candidate).cloned().collect();
        let missing: SkillSet = reference.difference(candidate).cloned().collect();
        let matched_count = matched.len();
        let total_count = reference.len();

        let coverage = if total_count == 0 {
            0.0
        } else {
            matched_count as f64 / total_count as f64
        };

        Self {
            matched,
            missing,
            matched_count,
            total_count,
            coverage,
        }
    }

    pub fn has_requirements(&self) -> bool {
        self.total_count > 0
    }

    pub fn matched_list(&self) -> Vec<String> {
        self.matched.iter().cloned().collect()
    }

    pub fn missing_list(&self) -> Vec<String> {
        self.missing.iter().cloned().collect()
    }
}

/// Required and preferred coverage for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillsBreakdown {
    pub required: CoverageBreakdown,
    pub preferred: CoverageBreakdown,
}

/// Normalize the three lists independently and compute both coverages.
pub fn compute_breakdown<S: AsRef<str>>(
    candidate_skills: &[S],
    required_skills: &[S],
    preferred_skills: &[S],
) -> SkillsBreakdown {
    let candidate = to_skill_set(candidate_skills);
    let required = to_skill_set(required_skills);
    let preferred = to_skill_set(preferred_skills);

    SkillsBreakdown {
        required: CoverageBreakdown::between(&candidate, &required),
        preferred: CoverageBreakdown::between(&candidate, &preferred),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn assert_invariant(breakdown: &CoverageBreakdown) {
        assert_eq!(
            breakdown.matched_count + breakdown.missing.len(),
            breakdown.total_count
        );
        if breakdown.total_count == 0 {
            assert_eq!(breakdown.coverage, 0.0);
        } else {
            let expected = breakdown.matched_count as f64 / breakdown.total_count as f64;
            assert!((breakdown.coverage - expected).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn computes_matched_and_missing_sets() {
        let breakdown = compute_breakdown(
            &strings(&["Python", "FastAPI", "PostgreSQL"]),
            &strings(&["python", "fastapi", "docker"]),
            &strings(&["AWS"]),
        );

        assert_eq!(breakdown.required.matched_list(), strings(&["fastapi", "python"]));
        assert_eq!(breakdown.required.missing_list(), strings(&["docker"]));
        assert_eq!(breakdown.required.matched_count, 2);
        assert_eq!(breakdown.required.total_count, 3);
        assert!((breakdown.required.coverage - 2.0 / 3.0).abs() < 1e-9);

        assert!(breakdown.preferred.matched.is_empty());
        assert_eq!(breakdown.preferred.missing_list(), strings(&["aws"]));
        assert_eq!(breakdown.preferred.coverage, 0.0);
    }

    #[test]
    fn empty_reference_is_neutral_zero() {
        let breakdown = compute_breakdown(&strings(&["rust", "go"]), &[], &[]);

        assert_eq!(breakdown.required.coverage, 0.0);
        assert_eq!(breakdown.preferred.coverage, 0.0);
        assert!(!breakdown.required.has_requirements());
        assert_eq!(breakdown.required.total_count, 0);
    }

    #[test]
    fn empty_inputs_produce_empty_breakdowns() {
        let empty: Vec<String> = Vec::new();
        let breakdown = compute_breakdown(&empty, &empty, &empty);

        assert_eq!(breakdown, SkillsBreakdown::default());
    }

    #[test]
    fn requirement_sentences_do_not_count_towards_totals() {
        let breakdown = compute_breakdown(
            &strings(&["rust"]),
            &strings(&[
                "Rust",
                "Bachelor's degree in Computer Science",
                "Experience with Kubernetes",
            ]),
            &[],
        );

        assert_eq!(breakdown.required.total_count, 1);
        assert_eq!(breakdown.required.coverage, 1.0);
    }

    #[test]
    fn coverage_invariant_holds_across_inputs() {
        let cases: &[(&[&str], &[&str])] = &[
            (&["a", "b", "c"], &["a", "d"]),
            (&[], &["x", "y"]),
            (&["x", "y"], &[]),
            (&["Go", "go", "GO"], &["go", "Rust", "  rust "]),
            (&["sql"], &["minimum two years", "sql"]),
        ];

        for (candidate, reference) in cases {
            let breakdown = compute_breakdown(&strings(candidate), &strings(reference), &[]);
            assert_invariant(&breakdown.required);
            assert_invariant(&breakdown.preferred);
        }
    }

    #[test]
    fn output_order_is_deterministic() {
        let first = compute_breakdown(
            &strings(&["zeta", "alpha", "mid"]),
            &strings(&["mid", "zeta", "omega", "alpha", "beta"]),
            &[],
        );
        let second = compute_breakdown(
            &strings(&["mid", "zeta", "alpha"]),
            &strings(&["beta", "alpha", "omega", "zeta", "mid"]),
            &[],
        );

        assert_eq!(first, second);
        assert_eq!(
            first.required.matched_list(),
            strings(&["alpha", "mid", "zeta"])
        );
        assert_eq!(first.required.missing_list(), strings(&["beta", "omega"]));
    }
}
