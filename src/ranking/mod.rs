/// Ranking store: durable per-job results and the incremental merge.
///
/// A result is read, merged with newly scored candidates, re-sorted and
/// rewritten as one transaction under the job's lock. The merge itself is a
/// pure function so it can be tested without any storage.

pub mod file;
pub mod lock;
pub mod memory;

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::RankerError;
use crate::model::{CandidateMatch, Candidates, JobMatchingResult};
pub use lock::{JobGuard, JobLocks};

/// Durable storage of one `JobMatchingResult` per job id.
#[async_trait]
pub trait RankingStore: Send + Sync {
    /// Acquire the exclusive right to rewrite `job_id`'s result.
    async fn lock(&self, job_id: &str) -> Result<JobGuard, RankerError>;

    /// Read a job's persisted result, `None` if nothing was ever written.
    ///
    /// An unreadable result is `RankerError::Serialization`.
    async fn load(&self, job_id: &str) -> Result<Option<JobMatchingResult>, RankerError>;

    /// Replace a job's result atomically: readers see the old or the new
    /// version, never a partial write.
    async fn save(&self, job_id: &str, result: &JobMatchingResult) -> Result<(), RankerError>;

    /// Ids of every job with a persisted result, sorted.
    async fn job_ids(&self) -> Result<Vec<String>, RankerError>;
}

/// Reject ids that cannot safely name a stored result.
pub fn validate_job_id(job_id: &str) -> Result<(), RankerError> {
    if job_id.trim().is_empty() {
        return Err(RankerError::validation("job_id", "Job id cannot be empty"));
    }
    if job_id.contains(&['/', '\\'][..]) || job_id == "." || job_id == ".." {
        return Err(RankerError::validation(
            "job_id",
            &format!("Job id '{}' must not contain path separators", job_id),
        ));
    }
    Ok(())
}

/// Descending by overall score; NaN compares equal so the sort stays total.
fn by_score_desc(a: &CandidateMatch, b: &CandidateMatch) -> Ordering {
    b.overall_score
        .partial_cmp(&a.overall_score)
        .unwrap_or(Ordering::Equal)
}

/// Merge `new_matches` into `prior`, keyed by `file_name`.
///
/// Entries keep their first-insertion position (prior entries first, then
/// new ones); a new entry for an existing key replaces it in place. The
/// result is stably sorted by overall score, so ties keep that order.
pub fn merge_matches(
    prior: Option<JobMatchingResult>,
    job_title: &str,
    job_file_name: &str,
    new_matches: Vec<CandidateMatch>,
) -> JobMatchingResult {
    let prior_matches = prior.map(|p| p.candidates.candidates).unwrap_or_default();

    let mut ordered: Vec<CandidateMatch> = Vec::with_capacity(prior_matches.len() + new_matches.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for m in prior_matches.into_iter().chain(new_matches) {
        match index.get(&m.file_name).copied() {
            Some(pos) => ordered[pos] = m,
            None => {
                index.insert(m.file_name.clone(), ordered.len());
                ordered.push(m);
            }
        }
    }

    ordered.sort_by(by_score_desc);

    JobMatchingResult {
        job_title: job_title.to_string(),
        job_file_name: job_file_name.to_string(),
        candidates: Candidates { candidates: ordered },
    }
}

/// Load a job's prior result, treating an unreadable one as absent.
///
/// The next save replaces the unreadable file. Storage failures still
/// propagate.
pub async fn load_prior(store: &dyn RankingStore, job_id: &str) -> Result<Option<JobMatchingResult>, RankerError> {
    match store.load(job_id).await {
        Ok(prior) => Ok(prior),
        Err(RankerError::Serialization(reason)) => {
            tracing::warn!(
                job_id,
                error = %reason,
                "Existing ranking is unreadable, it will be replaced"
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Merge `new_matches` into `prior` and persist the sorted result.
///
/// The caller must hold `guard` for `job_id`, typically from before `prior`
/// was loaded, so that no other writer can interleave.
pub async fn merge_and_persist(
    store: &dyn RankingStore,
    guard: &JobGuard,
    job_id: &str,
    job_title: &str,
    job_file_name: &str,
    new_matches: Vec<CandidateMatch>,
    prior: Option<JobMatchingResult>,
) -> Result<JobMatchingResult, RankerError> {
    if guard.job_id() != job_id {
        return Err(RankerError::Internal(format!(
            "Lock held for job '{}' but writing job '{}'",
            guard.job_id(),
            job_id
        )));
    }

    let added = new_matches.len();
    let merged = merge_matches(prior, job_title, job_file_name, new_matches);
    store.save(job_id, &merged).await?;

    tracing::info!(job_id, added, total = merged.len(), "Ranking persisted");
    Ok(merged)
}

/// Lock, load, merge and persist in one call.
pub async fn update_ranking(
    store: &dyn RankingStore,
    job_id: &str,
    job_title: &str,
    job_file_name: &str,
    new_matches: Vec<CandidateMatch>,
) -> Result<JobMatchingResult, RankerError> {
    let guard = store.lock(job_id).await?;
    let prior = load_prior(store, job_id).await?;
    merge_and_persist(store, &guard, job_id, job_title, job_file_name, new_matches, prior).await
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{CandidateMatch, Contact};
    use crate::scoring::category::IndividualScore;
    use crate::scoring::score::CategoryScore;

    pub fn sample_match(file_name: &str, overall: f64) -> CandidateMatch {
        CandidateMatch {
            name: format!("Candidate {}", file_name),
            file_name: file_name.to_string(),
            job_title: "Engineer".to_string(),
            contact: Contact::default(),
            scores: IndividualScore::from_fn(|_| CategoryScore::Scored(overall)),
            overall_score: overall,
            ranked_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::memory::InMemoryRankingStore;
    use super::test_support::sample_match;

    fn names(result: &JobMatchingResult) -> Vec<&str> {
        result.matches().iter().map(|m| m.file_name.as_str()).collect()
    }

    #[test]
    fn test_merge_adds_new_candidate_once() {
        let prior = merge_matches(None, "Dev", "dev.json", vec![sample_match("a", 70.0), sample_match("b", 90.0)]);
        let merged = merge_matches(Some(prior), "Dev", "dev.json", vec![sample_match("c", 80.0)]);
        assert_eq!(names(&merged), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_merge_ties_keep_insertion_order() {
        let merged = merge_matches(
            None,
            "Dev",
            "dev.json",
            vec![sample_match("first", 60.0), sample_match("second", 60.0), sample_match("top", 99.0)],
        );
        assert_eq!(names(&merged), vec!["top", "first", "second"]);
    }

    #[test]
    fn test_merge_new_entry_wins_on_same_key() {
        let prior = merge_matches(None, "Dev", "dev.json", vec![sample_match("a", 10.0), sample_match("b", 50.0)]);
        let merged = merge_matches(Some(prior), "Dev", "dev.json", vec![sample_match("a", 95.0)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(names(&merged), vec!["a", "b"]);
        assert_eq!(merged.matches()[0].overall_score, 95.0);
    }

    #[test]
    fn test_merge_with_nothing_new_is_identity() {
        let prior = merge_matches(None, "Dev", "dev.json", vec![sample_match("a", 10.0), sample_match("b", 50.0)]);
        let again = merge_matches(Some(prior.clone()), "Dev", "dev.json", Vec::new());
        assert_eq!(again, prior);
    }

    #[test]
    fn test_validate_job_id() {
        assert!(validate_job_id("senior_dev").is_ok());
        assert!(validate_job_id("").is_err());
        assert!(validate_job_id("../etc").is_err());
        assert!(validate_job_id("..").is_err());
    }

    #[tokio::test]
    async fn test_merge_and_persist_is_byte_stable() {
        let store = InMemoryRankingStore::new();
        let batch = vec![sample_match("a", 40.0), sample_match("b", 75.5)];

        update_ranking(&store, "dev", "Dev", "dev.json", batch.clone()).await.unwrap();
        let first = store.snapshot("dev").unwrap();

        update_ranking(&store, "dev", "Dev", "dev.json", batch).await.unwrap();
        let second = store.snapshot("dev").unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_merge_and_persist_requires_matching_guard() {
        let store = InMemoryRankingStore::new();
        let guard = store.lock("other").await.unwrap();
        let result = merge_and_persist(&store, &guard, "dev", "Dev", "dev.json", Vec::new(), None).await;
        assert!(matches!(result, Err(RankerError::Internal(_))));
    }

    #[tokio::test]
    async fn test_unreadable_prior_is_discarded() {
        let store = InMemoryRankingStore::new();
        store.put_raw("dev", "{ not json");
        let merged = update_ranking(&store, "dev", "Dev", "dev.json", vec![sample_match("a", 10.0)])
            .await
            .unwrap();
        assert_eq!(names(&merged), vec!["a"]);
    }
}
