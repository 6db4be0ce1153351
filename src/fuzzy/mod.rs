/// Lexical fuzzy matching of short extracted strings.
///
/// Compares skill, certification and language sets, and a single education
/// requirement against a candidate's degrees. Comparison runs from the job
/// (reference) side to the candidate side only: extra candidate items never
/// change the score.

pub mod metrics;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::scoring::score::CategoryScore;
use crate::text::normalize;
use metrics::{StringSimilarity, StrsimSimilarity};

/// Starting score for an education comparison with a stated requirement.
const EDUCATION_FLOOR: f64 = 80.0;
/// Similarity at or above which a degree counts as a near-exact match.
const EDUCATION_NEAR_EXACT: f64 = 90.0;
/// Score returned on a near-exact degree match.
const EDUCATION_MATCH_SCORE: f64 = 95.0;
/// Ceiling for partial degree matches.
const EDUCATION_PARTIAL_CAP: f64 = 90.0;

/// Fuzzy matcher over an injectable similarity metric.
#[derive(Clone)]
pub struct FuzzyMatcher {
    metric: Arc<dyn StringSimilarity>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        FuzzyMatcher::new(Arc::new(StrsimSimilarity))
    }
}

impl std::fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyMatcher").finish_non_exhaustive()
    }
}

/// Normalize every element and drop the ones that normalize to "".
///
/// Blank items are deliberately treated as absent rather than as a zero
/// match, so a list of blanks scores like an empty list.
fn normalized_set<S: AsRef<str>>(items: &[S]) -> BTreeSet<String> {
    items
        .iter()
        .map(|s| normalize(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

impl FuzzyMatcher {
    pub fn new(metric: Arc<dyn StringSimilarity>) -> Self {
        FuzzyMatcher { metric }
    }

    /// Best similarity of `reference` against any of `candidates`.
    fn best_similarity<'a>(&self, reference: &str, candidates: impl IntoIterator<Item = &'a String>) -> f64 {
        candidates
            .into_iter()
            .map(|c| self.metric.similarity(reference, c))
            .fold(0.0, f64::max)
    }

    /// Mean over reference items of the best match among candidate items.
    ///
    /// - empty reference: `NoReference`
    /// - empty candidate set: neutral 50
    pub fn set_match<R: AsRef<str>, C: AsRef<str>>(&self, reference: &[R], candidate: &[C]) -> CategoryScore {
        let reference = normalized_set(reference);
        let candidate = normalized_set(candidate);

        if reference.is_empty() {
            return CategoryScore::NoReference;
        }
        if candidate.is_empty() {
            return CategoryScore::neutral();
        }

        let total: f64 = reference
            .iter()
            .map(|r| self.best_similarity(r, &candidate))
            .sum();
        CategoryScore::Scored(total / reference.len() as f64)
    }

    /// Education requirement against a candidate's degree strings.
    ///
    /// Starts at a floor of 80. Any degree scoring 90 or more returns 95
    /// immediately; otherwise partial matches can only raise the floor, up to 90.
    pub fn education_match<C: AsRef<str>>(&self, reference: &str, candidates: &[C]) -> CategoryScore {
        let reference = normalize(reference);
        if reference.is_empty() {
            return CategoryScore::NoReference;
        }
        let candidates: Vec<String> = candidates
            .iter()
            .map(|c| normalize(c.as_ref()))
            // Blank degrees are absent, not a sub-floor match
            .filter(|c| !c.is_empty())
            .collect();
        if candidates.is_empty() {
            return CategoryScore::neutral();
        }

        let mut best = EDUCATION_FLOOR;
        for degree in &candidates {
            let score = self.metric.similarity(&reference, degree);
            if score >= EDUCATION_NEAR_EXACT {
                return CategoryScore::Scored(EDUCATION_MATCH_SCORE);
            }
            best = best.max(score.min(EDUCATION_PARTIAL_CAP));
        }
        CategoryScore::Scored(best)
    }
}
