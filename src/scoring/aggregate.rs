/// Score aggregation with weight renormalisation.
///
/// Only measured, non-negative categories contribute, to both the numerator
/// and the denominator. A candidate is never penalised for a category the
/// job left unspecified.

use super::category::{Category, IndividualScore};
use super::score::CategoryScore;
use super::weights::WeightTable;

/// Weighted mean of the includable category scores, or 0.0 when nothing is
/// includable.
pub fn aggregate(scores: &IndividualScore, weights: &WeightTable) -> f64 {
    aggregate_pairs(
        Category::ALL
            .iter()
            .map(|&c| (scores.get(c), weights.get(c))),
    )
}

/// Same as `aggregate`, over arbitrary (score, weight) pairs.
pub fn aggregate_pairs<I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (CategoryScore, f64)>,
{
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for (score, weight) in pairs {
        if let Some(value) = score.value().filter(|v| *v >= 0.0) {
            weighted_sum += value * weight;
            total_weight += weight;
        }
    }

    if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    }
}

/// Round to two decimal places, as stored in `overall_score`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_sentinels_yield_zero() {
        assert_eq!(aggregate(&IndividualScore::empty(), &WeightTable::default()), 0.0);
    }

    #[test]
    fn test_excluded_categories_renormalise() {
        let mut scores = IndividualScore::empty();
        scores.skills_match = CategoryScore::Scored(80.0);
        scores.languages_match = CategoryScore::Scored(50.0);
        // (80*0.20 + 50*0.10) / 0.30 = 70
        let overall = aggregate(&scores, &WeightTable::default());
        assert!((overall - 70.0).abs() < 1e-9, "overall was {}", overall);
    }

    #[test]
    fn test_negative_cosine_is_excluded() {
        let mut scores = IndividualScore::empty();
        scores.job_title_relevance = CategoryScore::Scored(-12.0);
        scores.skills_match = CategoryScore::Scored(90.0);
        let overall = aggregate(&scores, &WeightTable::default());
        assert!((overall - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weight_everywhere() {
        let scores = IndividualScore::from_fn(|_| CategoryScore::Scored(70.0));
        let mut weights = WeightTable::default();
        for c in Category::ALL {
            weights.set(c, 0.0);
        }
        assert_eq!(aggregate(&scores, &weights), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(71.23456), 71.23);
        assert_eq!(round2(71.235001), 71.24);
    }

    fn arb_score() -> impl Strategy<Value = CategoryScore> {
        prop_oneof![
            Just(CategoryScore::NoReference),
            (0.0f64..=100.0).prop_map(CategoryScore::Scored),
        ]
    }

    proptest! {
        #[test]
        fn prop_order_invariant(
            pairs in proptest::collection::vec((arb_score(), 0.0f64..1.0), 0..11),
            seed in any::<u64>(),
        ) {
            let forward = aggregate_pairs(pairs.clone());
            let mut shuffled = pairs.clone();
            // Deterministic rotation + reversal stands in for a shuffle
            if !shuffled.is_empty() {
                let k = (seed as usize) % shuffled.len();
                shuffled.rotate_left(k);
            }
            shuffled.reverse();
            let permuted = aggregate_pairs(shuffled);
            prop_assert!((forward - permuted).abs() < 1e-9);
        }

        #[test]
        fn prop_all_sentinel_is_zero(weights in proptest::collection::vec(0.0f64..10.0, 11)) {
            let pairs = weights.into_iter().map(|w| (CategoryScore::NoReference, w));
            prop_assert_eq!(aggregate_pairs(pairs), 0.0);
        }

        #[test]
        fn prop_result_within_included_range(
            pairs in proptest::collection::vec((arb_score(), 0.01f64..1.0), 1..11),
        ) {
            let overall = aggregate_pairs(pairs.clone());
            let included: Vec<f64> = pairs.iter().filter_map(|(s, _)| s.value()).collect();
            if included.is_empty() {
                prop_assert_eq!(overall, 0.0);
            } else {
                let lo = included.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = included.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(overall >= lo - 1e-9 && overall <= hi + 1e-9);
            }
        }
    }
}
