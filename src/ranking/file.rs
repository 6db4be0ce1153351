/// JSON-file ranking store.
///
/// One pretty-printed `<job_id>_ranked_resumes.json` per job in a single
/// directory. Writes go to a temp file in the same directory, are fsynced,
/// then renamed over the target, so a reader never sees a partial file.
/// A sibling `<job_id>.lock` carries an advisory lock for cross-process writers.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tempfile::NamedTempFile;
use tokio::task;

use super::{validate_job_id, JobGuard, JobLocks, RankingStore};
use crate::errors::RankerError;
use crate::model::JobMatchingResult;

const RESULT_SUFFIX: &str = "_ranked_resumes.json";

#[derive(Debug)]
pub struct FileRankingStore {
    dir: PathBuf,
    locks: JobLocks,
}

impl FileRankingStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RankerError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            RankerError::Storage(format!("Failed to create output dir {}: {}", dir.display(), e))
        })?;
        Ok(FileRankingStore {
            dir,
            locks: JobLocks::new(),
        })
    }

    /// Open an existing store without creating anything on disk.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, RankerError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(RankerError::not_found(dir.display().to_string()));
        }
        Ok(FileRankingStore {
            dir,
            locks: JobLocks::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a job's result lives.
    pub fn result_path(&self, job_id: &str) -> PathBuf {
        self.dir.join(format!("{}{}", job_id, RESULT_SUFFIX))
    }

    fn lock_path(&self, job_id: &str) -> PathBuf {
        self.dir.join(format!("{}.lock", job_id))
    }
}

/// Write `contents` to `path` via temp file + fsync + rename.
fn write_atomically(dir: &Path, path: &Path, contents: &[u8]) -> Result<(), RankerError> {
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| RankerError::Storage(format!("Failed to create temp file in {}: {}", dir.display(), e)))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.flush())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| RankerError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
    tmp.persist(path)
        .map_err(|e| RankerError::Storage(format!("Failed to replace {}: {}", path.display(), e.error)))?;
    Ok(())
}

#[async_trait]
impl RankingStore for FileRankingStore {
    async fn lock(&self, job_id: &str) -> Result<JobGuard, RankerError> {
        validate_job_id(job_id)?;
        let guard = self.locks.acquire(job_id).await;

        let lock_path = self.lock_path(job_id);
        let file = task::spawn_blocking(move || {
            let file = OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)
                .map_err(|e| RankerError::Storage(format!("Failed to open {}: {}", lock_path.display(), e)))?;
            file.lock_exclusive()
                .map_err(|e| RankerError::Storage(format!("Failed to lock {}: {}", lock_path.display(), e)))?;
            Ok::<_, RankerError>(file)
        })
        .await
        .map_err(|e| RankerError::Internal(e.to_string()))??;

        Ok(guard.with_file(file))
    }

    async fn load(&self, job_id: &str) -> Result<Option<JobMatchingResult>, RankerError> {
        validate_job_id(job_id)?;
        let path = self.result_path(job_id);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RankerError::Storage(format!("Failed to read {}: {}", path.display(), e)));
            }
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| RankerError::Serialization(format!("{}: {}", path.display(), e)))
    }

    async fn save(&self, job_id: &str, result: &JobMatchingResult) -> Result<(), RankerError> {
        validate_job_id(job_id)?;
        let contents = serde_json::to_string_pretty(result)?;
        let dir = self.dir.clone();
        let path = self.result_path(job_id);

        task::spawn_blocking(move || write_atomically(&dir, &path, contents.as_bytes()))
            .await
            .map_err(|e| RankerError::Internal(e.to_string()))?
    }

    async fn job_ids(&self) -> Result<Vec<String>, RankerError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(RESULT_SUFFIX))
            {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::test_support::sample_match;
    use crate::ranking::{merge_matches, update_ranking};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRankingStore::new(dir.path()).unwrap();

        assert!(store.load("backend").await.unwrap().is_none());

        let result = merge_matches(None, "Backend", "backend.json", vec![sample_match("a", 33.0)]);
        store.save("backend", &result).await.unwrap();

        assert!(store.result_path("backend").exists());
        assert_eq!(store.load("backend").await.unwrap(), Some(result));
    }

    #[tokio::test]
    async fn test_rerun_is_byte_stable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRankingStore::new(dir.path()).unwrap();
        let batch = vec![sample_match("a", 61.0), sample_match("b", 72.25)];

        update_ranking(&store, "backend", "Backend", "backend.json", batch.clone()).await.unwrap();
        let first = std::fs::read(store.result_path("backend")).unwrap();
        update_ranking(&store, "backend", "Backend", "backend.json", batch).await.unwrap();
        let second = std::fs::read(store.result_path("backend")).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRankingStore::new(dir.path()).unwrap();
        std::fs::write(store.result_path("backend"), "{\"job_title\": ").unwrap();
        assert!(matches!(store.load("backend").await, Err(RankerError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_job_ids_lists_results_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRankingStore::new(dir.path()).unwrap();
        let result = merge_matches(None, "X", "x.json", Vec::new());
        store.save("zeta", &result).await.unwrap();
        store.save("alpha", &result).await.unwrap();
        let _guard = store.lock("alpha").await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        assert_eq!(store.job_ids().await.unwrap(), vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRankingStore::new(dir.path()).unwrap();
        let result = merge_matches(None, "X", "x.json", vec![sample_match("a", 1.0)]);
        store.save("x", &result).await.unwrap();
        store.save("x", &result).await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["x_ranked_resumes.json".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_updates_keep_every_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileRankingStore::new(dir.path()).unwrap());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let m = sample_match(&format!("c{}", i), i as f64 * 10.0);
                update_ranking(store.as_ref(), "shared", "Shared", "shared.json", vec![m])
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let result = store.load("shared").await.unwrap().unwrap();
        assert_eq!(result.len(), 8);
        let scores: Vec<f64> = result.matches().iter().map(|m| m.overall_score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(scores, sorted);
    }

    #[tokio::test]
    async fn test_open_reads_without_creating() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("never-written");
        assert!(matches!(FileRankingStore::open(&missing), Err(RankerError::NotFound { .. })));
        assert!(!missing.exists());

        let writer = FileRankingStore::new(dir.path()).unwrap();
        let result = merge_matches(None, "X", "x.json", vec![sample_match("a", 5.0)]);
        writer.save("x", &result).await.unwrap();

        let reader = FileRankingStore::open(dir.path()).unwrap();
        assert_eq!(reader.load("x").await.unwrap(), Some(result));
    }

    #[test]
    fn test_new_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileRankingStore::new(&nested).unwrap();
        assert!(store.dir().is_dir());
    }
}
