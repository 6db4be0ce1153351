/// In-memory ranking store.
///
/// Keeps each result as its serialized JSON, exactly as the file store would
/// write it, so byte-level behaviour can be checked without a filesystem.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{validate_job_id, JobGuard, JobLocks, RankingStore};
use crate::errors::RankerError;
use crate::model::JobMatchingResult;

#[derive(Debug, Default)]
pub struct InMemoryRankingStore {
    results: Mutex<BTreeMap<String, String>>,
    locks: JobLocks,
}

impl InMemoryRankingStore {
    pub fn new() -> Self {
        InMemoryRankingStore::default()
    }

    fn results(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.results.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Serialized form of a job's result, as last saved.
    pub fn snapshot(&self, job_id: &str) -> Option<String> {
        self.results().get(job_id).cloned()
    }

    /// Store raw text as a job's result, bypassing serialization.
    pub fn put_raw(&self, job_id: &str, raw: &str) {
        self.results().insert(job_id.to_string(), raw.to_string());
    }
}

#[async_trait]
impl RankingStore for InMemoryRankingStore {
    async fn lock(&self, job_id: &str) -> Result<JobGuard, RankerError> {
        validate_job_id(job_id)?;
        Ok(self.locks.acquire(job_id).await)
    }

    async fn load(&self, job_id: &str) -> Result<Option<JobMatchingResult>, RankerError> {
        validate_job_id(job_id)?;
        match self.snapshot(job_id) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, job_id: &str, result: &JobMatchingResult) -> Result<(), RankerError> {
        validate_job_id(job_id)?;
        let raw = serde_json::to_string_pretty(result)?;
        self.results().insert(job_id.to_string(), raw);
        Ok(())
    }

    async fn job_ids(&self) -> Result<Vec<String>, RankerError> {
        Ok(self.results().keys().cloned().collect())
    }
}
