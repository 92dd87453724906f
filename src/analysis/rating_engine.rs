use chrono::{DateTime, Utc};

use crate::analysis::scorers::score_dimensions;
use crate::models::{
    Dimension, DimensionScores, DimensionWeights, Rating, RatingTier, ScoreBreakdown, ScoreResult,
    UserData,
};

/// Fixed dimension weights; they sum to 1.0.
pub const WEIGHTS: DimensionWeights = DimensionWeights {
    documentation: 0.20,
    structure: 0.20,
    activity: 0.15,
    organization: 0.15,
    impact: 0.15,
    technical: 0.15,
};

/// Combines dimension scores into the overall score and rating tier.
pub struct RatingEngine {
    weights: DimensionWeights,
}

impl RatingEngine {
    pub fn new() -> Self {
        Self { weights: WEIGHTS }
    }

    pub fn weights(&self) -> &DimensionWeights {
        &self.weights
    }

    /// Scores every dimension of `data` and aggregates the result.
    pub fn score(&self, data: &UserData, now: DateTime<Utc>) -> ScoreResult {
        let dimensions = score_dimensions(data, now);
        self.aggregate(dimensions)
    }

    pub fn aggregate(&self, dimensions: DimensionScores) -> ScoreResult {
        let weighted = self.weighted(&dimensions);
        let overall = self.overall(&weighted);
        let rating = Rating::from(rating_tier(overall));

        tracing::debug!(
            "Aggregated dimension total {} into overall {} ({})",
            weighted.total(),
            overall,
            rating.label
        );

        ScoreResult {
            overall,
            rating,
            dimensions,
            breakdown: ScoreBreakdown { raw: dimensions, weighted },
            weights: self.weights,
        }
    }

    /// Per-dimension contribution, each rounded on its own.
    pub fn weighted(&self, dimensions: &DimensionScores) -> DimensionScores {
        let mut weighted = DimensionScores::default();
        for (dimension, score) in dimensions.iter() {
            let contribution = (score as f64 * self.weights.get(dimension)).round();
            weighted.set(dimension, contribution as u8);
        }
        weighted
    }

    /// Independent rounding can push the sum to 101, hence the cap after summing.
    pub fn overall(&self, weighted: &DimensionScores) -> u8 {
        weighted.total().min(100) as u8
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Tiers are closed below: exactly 90 is Excellent, 89 is Strong.
pub fn rating_tier(overall: u8) -> RatingTier {
    match overall {
        s if s >= 90 => RatingTier::Excellent,
        s if s >= 75 => RatingTier::Strong,
        s if s >= 50 => RatingTier::Average,
        s if s >= 25 => RatingTier::Weak,
        _ => RatingTier::Critical,
    }
}

pub fn weight_sum(weights: &DimensionWeights) -> f64 {
    Dimension::ALL.iter().map(|d| weights.get(*d)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::fixed_now;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn uniform(value: u8) -> DimensionScores {
        DimensionScores {
            documentation: value,
            structure: value,
            activity: value,
            organization: value,
            impact: value,
            technical: value,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        assert!((weight_sum(&WEIGHTS) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tier_boundaries() {
        let cases = [
            (100, RatingTier::Excellent),
            (90, RatingTier::Excellent),
            (89, RatingTier::Strong),
            (75, RatingTier::Strong),
            (74, RatingTier::Average),
            (50, RatingTier::Average),
            (49, RatingTier::Weak),
            (25, RatingTier::Weak),
            (24, RatingTier::Critical),
            (0, RatingTier::Critical),
        ];
        for (score, tier) in cases {
            assert_eq!(rating_tier(score), tier, "score {}", score);
        }
    }

    #[test]
    fn weighted_contributions_round_individually() {
        let engine = RatingEngine::new();
        let dims = DimensionScores {
            documentation: 85,
            structure: 62,
            activity: 45,
            organization: 77,
            impact: 10,
            technical: 60,
        };
        let result = engine.aggregate(dims);
        let expected = DimensionScores {
            documentation: 17,
            structure: 12,
            activity: 7,
            organization: 12,
            impact: 2,
            technical: 9,
        };
        assert_eq!(result.breakdown.weighted, expected);
        assert_eq!(result.overall, 59);
        assert_eq!(result.rating.label, "Average");
        assert_eq!(result.breakdown.raw, dims);
    }

    #[test]
    fn rounding_overflow_is_capped() {
        let engine = RatingEngine::new();
        // 0.15 * 97 = 14.55 rounds up on four dimensions, 0.20 * 98 = 19.6 on two.
        let dims = DimensionScores {
            documentation: 98,
            structure: 98,
            activity: 97,
            organization: 97,
            impact: 97,
            technical: 97,
        };
        let weighted = engine.weighted(&dims);
        assert_eq!(weighted.total(), 100);
        assert_eq!(engine.overall(&uniform(100)), 100);
        assert_eq!(engine.overall(&DimensionScores { documentation: 21, ..uniform(16) }), 100);
    }

    #[test]
    fn empty_account_is_critical() {
        let result = RatingEngine::new().score(&UserData::default(), fixed_now());
        assert_eq!(result.dimensions, DimensionScores::default());
        assert_eq!(result.overall, 0);
        assert_eq!(result.rating.tier, RatingTier::Critical);
        assert_eq!(result.rating.color, "#DC2626");
    }

    fn arb_scores() -> impl Strategy<Value = DimensionScores> {
        proptest::array::uniform6(0u8..=100).prop_map(|v| DimensionScores {
            documentation: v[0],
            structure: v[1],
            activity: v[2],
            organization: v[3],
            impact: v[4],
            technical: v[5],
        })
    }

    proptest! {
        #[test]
        fn overall_is_bounded(dims in arb_scores()) {
            let result = RatingEngine::new().aggregate(dims);
            prop_assert!(result.overall <= 100);
            prop_assert!(result.breakdown.weighted.total() <= 101);
        }

        #[test]
        fn overall_is_monotonic(dims in arb_scores(), index in 0usize..6, bump in 0u8..=100) {
            let engine = RatingEngine::new();
            let dimension = Dimension::ALL[index];
            let mut raised = dims;
            raised.set(dimension, dims.get(dimension).saturating_add(bump).min(100));
            prop_assert!(engine.aggregate(raised).overall >= engine.aggregate(dims).overall);
        }
    }
}
