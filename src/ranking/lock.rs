/// Per-job write locks.
///
/// One merge-and-persist per job at a time. In-process callers serialize on
/// a tokio mutex per job id; the file store additionally holds an advisory
/// `fs2` lock so separate processes cooperate too.

use std::collections::HashMap;
use std::fs::File;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

/// Registry of per-job mutexes, created on first use.
#[derive(Debug, Default)]
pub struct JobLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl JobLocks {
    pub fn new() -> Self {
        JobLocks::default()
    }

    /// Wait for exclusive in-process access to `job_id`.
    pub async fn acquire(&self, job_id: &str) -> JobGuard {
        let mutex = {
            let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(map.entry(job_id.to_string()).or_default())
        };
        let local = mutex.lock_owned().await;
        JobGuard {
            job_id: job_id.to_string(),
            _local: local,
            _file: None,
        }
    }
}

/// Exclusive right to rewrite one job's result. Released on drop.
#[derive(Debug)]
pub struct JobGuard {
    job_id: String,
    _local: OwnedMutexGuard<()>,
    /// Advisory lock file; the OS lock goes away when the handle closes.
    _file: Option<File>,
}

impl JobGuard {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub(crate) fn with_file(mut self, file: File) -> Self {
        self._file = Some(file);
        self
    }
}
