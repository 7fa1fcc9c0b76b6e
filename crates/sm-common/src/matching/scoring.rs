use super::weights::WeightVector;

/// Clamp into `[0, 1]`; non-finite values map to `0.0`.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Weighted linear combination of similarity and the two coverages.
///
/// `weights` must already be normalized; this does not re-normalize. The
/// result is clamped into `[0, 1]` so sums inside the normalization tolerance
/// cannot push a perfect match above 1.0.
pub fn combine_scores(
    raw_similarity: f64,
    required_coverage: f64,
    preferred_coverage: f64,
    weights: &WeightVector,
) -> f64 {
    let total = weights.similarity * raw_similarity
        + weights.required_skills * required_coverage
        + weights.preferred_skills * preferred_coverage;

    clamp_unit(total)
}
