use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weights used when the caller supplies none. Semantic fit dominates, hard
/// skill coverage still moves the rank.
pub const DEFAULT_WEIGHTS: WeightVector = WeightVector {
    similarity: 0.6,
    required_skills: 0.3,
    preferred_skills: 0.1,
};

/// Fallback for an all-zero request: rank purely by similarity.
pub const SIMILARITY_ONLY_WEIGHTS: WeightVector = WeightVector {
    similarity: 1.0,
    required_skills: 0.0,
    preferred_skills: 0.0,
};

/// Sums within this distance of 1.0 are left untouched by normalization.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub similarity: f64,
    pub required_skills: f64,
    pub preferred_skills: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("weight `{field}` must be non-negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("weight `{field}` must be a finite number")]
    NotFinite { field: &'static str },
}

impl WeightVector {
    pub fn new(similarity: f64, required_skills: f64, preferred_skills: f64) -> Self {
        Self {
            similarity,
            required_skills,
            preferred_skills,
        }
    }

    pub fn sum(&self) -> f64 {
        self.similarity + self.required_skills + self.preferred_skills
    }

    fn components(&self) -> [(&'static str, f64); 3] {
        [
            ("similarity", self.similarity),
            ("required_skills", self.required_skills),
            ("preferred_skills", self.preferred_skills),
        ]
    }

    /// Reject negative or non-finite components. Nothing is clamped.
    pub fn validate(&self) -> Result<(), WeightError> {
        for (field, value) in self.components() {
            if !value.is_finite() {
                return Err(WeightError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(WeightError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Validate, then rescale so the components sum to 1.0.
    pub fn normalized(self) -> Result<Self, WeightError> {
        self.validate()?;

        let mut scaled = self;
        let mut total = scaled.sum();
        if total == 0.0 {
            return Ok(SIMILARITY_ONLY_WEIGHTS);
        }

        // Finite components can still overflow the sum; bring them down to
        // at most 1.0 first.
        if !total.is_finite() {
            let largest = self
                .similarity
                .max(self.required_skills)
                .max(self.preferred_skills);
            scaled = Self {
                similarity: self.similarity / largest,
                required_skills: self.required_skills / largest,
                preferred_skills: self.preferred_skills / largest,
            };
            total = scaled.sum();
        }

        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Ok(Self {
                similarity: scaled.similarity / total,
                required_skills: scaled.required_skills / total,
                preferred_skills: scaled.preferred_skills / total,
            });
        }

        Ok(scaled)
    }
}

/// Normalize caller-supplied weights, falling back to [`DEFAULT_WEIGHTS`].
pub fn normalize_weights(weights: Option<WeightVector>) -> Result<WeightVector, WeightError> {
    weights.unwrap_or(DEFAULT_WEIGHTS).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((DEFAULT_WEIGHTS.sum() - 1.0).abs() < 1e-9);
        assert_eq!(WeightVector::default(), DEFAULT_WEIGHTS);
        assert_eq!(normalize_weights(None).unwrap(), DEFAULT_WEIGHTS);
    }

    #[test]
    fn rescales_weights_that_do_not_sum_to_one() {
        let normalized = WeightVector::new(1.0, 1.0, 0.0).normalized().unwrap();

        assert!((normalized.similarity - 0.5).abs() < 1e-9);
        assert!((normalized.required_skills - 0.5).abs() < 1e-9);
        assert_eq!(normalized.preferred_skills, 0.0);
    }

    #[test]
    fn leaves_weights_within_tolerance_untouched() {
        let weights = WeightVector::new(0.6, 0.3, 0.1005);

        assert_eq!(weights.normalized().unwrap(), weights);
    }

    #[test]
    fn all_zero_falls_back_to_similarity_only() {
        let normalized = WeightVector::new(0.0, 0.0, 0.0).normalized().unwrap();

        assert_eq!(normalized, SIMILARITY_ONLY_WEIGHTS);
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let samples = [
            (0.2, 0.2, 0.2),
            (1.0, 0.0, 0.0),
            (0.0, 0.0, 0.7),
            (0.9, 0.9, 0.9),
            (1e-6, 3e-6, 0.0),
            (0.33, 0.33, 0.33),
            (5.0, 2.5, 0.25),
            (f64::MAX, f64::MAX, 0.0),
            (f64::MAX, f64::MAX, f64::MAX),
            (f64::MAX, 1.0, 0.0),
        ];

        for (s, r, p) in samples {
            let normalized = WeightVector::new(s, r, p).normalized().unwrap();
            assert!(
                (normalized.sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE,
                "sum {} for {:?}",
                normalized.sum(),
                (s, r, p)
            );
        }
    }

    #[test]
    fn overflowing_sum_keeps_proportions() {
        let normalized = WeightVector::new(f64::MAX, f64::MAX, 0.0).normalized().unwrap();

        assert!((normalized.similarity - 0.5).abs() < 1e-9);
        assert!((normalized.required_skills - 0.5).abs() < 1e-9);
        assert_eq!(normalized.preferred_skills, 0.0);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = WeightVector::new(0.6, -0.1, 0.5).normalized().unwrap_err();

        assert_eq!(
            err,
            WeightError::Negative {
                field: "required_skills",
                value: -0.1
            }
        );
        assert!(err.to_string().contains("required_skills"));
    }

    #[test]
    fn non_finite_weight_is_rejected() {
        let err = WeightVector::new(f64::NAN, 0.3, 0.1).normalized().unwrap_err();
        assert_eq!(err, WeightError::NotFinite { field: "similarity" });

        let err = WeightVector::new(0.6, 0.3, f64::INFINITY)
            .normalized()
            .unwrap_err();
        assert_eq!(
            err,
            WeightError::NotFinite {
                field: "preferred_skills"
            }
        );
    }
}
