use super::skills::SkillsBreakdown;

pub const STRONG_ALIGNMENT_THRESHOLD: f64 = 0.85;
pub const GOOD_FIT_THRESHOLD: f64 = 0.75;

/// Qualitative note for a raw similarity, if it is high enough to mention.
pub fn similarity_phrase(raw_similarity: f64) -> Option<&'static str> {
    if raw_similarity >= STRONG_ALIGNMENT_THRESHOLD {
        Some("strong semantic alignment")
    } else if raw_similarity >= GOOD_FIT_THRESHOLD {
        Some("good semantic fit")
    } else {
        None
    }
}

/// Template explanation of a match, used whenever no richer insight exists.
///
/// `"Matched 2/3 required skills, 1/1 preferred skills, good semantic fit."`
/// or, with nothing to report, `"Match score: 68%"`.
pub fn summarize(raw_similarity: f64, breakdown: &SkillsBreakdown, final_score: f64) -> String {
    let mut parts = Vec::with_capacity(3);

    if breakdown.required.has_requirements() {
        parts.push(format!(
            "{}/{} required skills",
            breakdown.required.matched_count, breakdown.required.total_count
        ));
    }
    if breakdown.preferred.has_requirements() {
        parts.push(format!(
            "{}/{} preferred skills",
            breakdown.preferred.matched_count, breakdown.preferred.total_count
        ));
    }
    if let Some(phrase) = similarity_phrase(raw_similarity) {
        parts.push(phrase.to_string());
    }

    if parts.is_empty() {
        format!("Match score: {:.0}%", final_score * 100.0)
    } else {
        format!("Matched {}.", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::skills::compute_breakdown;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn lists_required_and_preferred_counts() {
        let breakdown = compute_breakdown(
            &strings(&["python", "fastapi", "postgresql"]),
            &strings(&["python", "fastapi", "docker"]),
            &strings(&["aws"]),
        );

        assert_eq!(
            summarize(0.80, &breakdown, 0.68),
            "Matched 2/3 required skills, 0/1 preferred skills, good semantic fit."
        );
    }

    #[test]
    fn strong_alignment_above_threshold() {
        let breakdown = compute_breakdown(&strings(&["rust"]), &strings(&["rust"]), &[]);

        assert_eq!(
            summarize(0.91, &breakdown, 0.9),
            "Matched 1/1 required skills, strong semantic alignment."
        );
    }

    #[test]
    fn omits_similarity_note_below_threshold() {
        let breakdown = compute_breakdown(&[], &[], &strings(&["go", "k8s"]));

        assert_eq!(
            summarize(0.74, &breakdown, 0.5),
            "Matched 0/2 preferred skills."
        );
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(similarity_phrase(0.85), Some("strong semantic alignment"));
        assert_eq!(similarity_phrase(0.75), Some("good semantic fit"));
        assert_eq!(similarity_phrase(0.7499), None);
    }

    #[test]
    fn falls_back_to_percentage_when_nothing_applies() {
        let breakdown = SkillsBreakdown::default();

        assert_eq!(summarize(0.72, &breakdown, 0.432), "Match score: 43%");
        assert_eq!(summarize(0.1, &breakdown, 0.0), "Match score: 0%");
    }
}
