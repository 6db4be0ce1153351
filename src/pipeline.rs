/// Ranking runs: score a batch of candidates against a job and fold the
/// results into the job's persisted ranking.
///
/// A job's lock is held from reading the prior result until the merged one
/// is written, so two runs for the same job never lose each other's
/// candidates. Different jobs proceed independently.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::errors::RankerError;
use crate::model::{Candidate, CandidateMatch, JobRequirements};
use crate::ranking::{load_prior, merge_and_persist, RankingStore};
use crate::scoring::{CategoryScoreCalculator, JobProfile};

/// Outcome of ranking one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    pub job_id: String,
    pub job_title: String,
    /// Candidates newly scored and merged in this run
    pub scored: usize,
    /// Candidates already present in the persisted ranking, or repeating a
    /// merge key earlier in the same batch
    pub skipped: usize,
    /// Candidates with a blank merge key, never scored
    pub rejected: usize,
    /// Candidates whose scoring failed; they are absent from the ranking
    pub failed: usize,
    /// Size of the ranking after the run
    pub total: usize,
}

/// Scores candidates and persists rankings through a `RankingStore`.
pub struct Ranker {
    calculator: CategoryScoreCalculator,
    store: Arc<dyn RankingStore>,
    max_concurrency: usize,
}

impl Ranker {
    pub fn new(calculator: CategoryScoreCalculator, store: Arc<dyn RankingStore>, max_concurrency: usize) -> Self {
        Ranker {
            calculator,
            store,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn store(&self) -> &Arc<dyn RankingStore> {
        &self.store
    }

    /// Score one candidate against one job without touching the store.
    pub async fn score_pair(&self, job: &JobRequirements, candidate: &Candidate) -> Result<CandidateMatch, RankerError> {
        let profile = self.calculator.profile_job(job).await?;
        Ok(self.calculator.match_candidate(&profile, candidate).await?)
    }

    /// Rank `candidates` for one job and merge them into its stored ranking.
    ///
    /// Candidates whose merge key is already ranked, or repeats an earlier
    /// one in the batch, are skipped. A blank merge key is rejected. A candidate
    /// that fails to score is logged and left out; the rest still land. When
    /// nothing new was scored the stored ranking is left untouched.
    pub async fn rank_job(
        &self,
        job_id: &str,
        job_file_name: &str,
        job: &JobRequirements,
        candidates: Vec<Candidate>,
    ) -> Result<RankingReport, RankerError> {
        let guard = self.store.lock(job_id).await?;
        let prior = load_prior(self.store.as_ref(), job_id).await?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut fresh = Vec::with_capacity(candidates.len());
        let mut skipped = 0;
        let mut rejected = 0;
        for candidate in candidates {
            if candidate.filename.trim().is_empty() {
                rejected += 1;
                tracing::warn!(job_id, name = %candidate.name, "Candidate has no merge key, skipping");
                continue;
            }
            let known = prior.as_ref().is_some_and(|p| p.contains(&candidate.filename));
            // First occurrence of a key within the batch wins
            if known || !seen.insert(candidate.filename.clone()) {
                skipped += 1;
                continue;
            }
            fresh.push(candidate);
        }

        let unchanged = |failed: usize| RankingReport {
            job_id: job_id.to_string(),
            job_title: job.job_title.clone(),
            scored: 0,
            skipped,
            rejected,
            failed,
            total: prior.as_ref().map_or(0, |p| p.len()),
        };

        if fresh.is_empty() {
            tracing::info!(job_id, skipped, rejected, "No new candidates, ranking unchanged");
            return Ok(unchanged(0));
        }

        let profile = Arc::new(self.calculator.profile_job(job).await?);
        let (matches, failed) = self.score_all(job_id, profile, fresh).await;

        if matches.is_empty() {
            tracing::warn!(job_id, failed, "Every new candidate failed to score, ranking unchanged");
            return Ok(unchanged(failed));
        }

        let scored = matches.len();
        let merged = merge_and_persist(
            self.store.as_ref(),
            &guard,
            job_id,
            &job.job_title,
            job_file_name,
            matches,
            prior,
        )
        .await?;

        Ok(RankingReport {
            job_id: job_id.to_string(),
            job_title: job.job_title.clone(),
            scored,
            skipped,
            rejected,
            failed,
            total: merged.len(),
        })
    }

    /// Score candidates concurrently, at most `max_concurrency` at a time.
    ///
    /// Matches come back in input order.
    async fn score_all(
        &self,
        job_id: &str,
        profile: Arc<JobProfile>,
        candidates: Vec<Candidate>,
    ) -> (Vec<CandidateMatch>, usize) {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, candidate) in candidates.into_iter().enumerate() {
            let calculator = self.calculator.clone();
            let profile = Arc::clone(&profile);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let result = calculator.match_candidate(&profile, &candidate).await;
                (index, candidate.filename, result)
            });
        }

        let mut scored = Vec::new();
        let mut failed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(m))) => scored.push((index, m)),
                Ok((_, file_name, Err(e))) => {
                    failed += 1;
                    tracing::warn!(job_id, file_name = %file_name, error = %e, "Failed to score candidate, skipping");
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(job_id, error = %e, "Scoring task aborted");
                }
            }
        }

        scored.sort_by_key(|(index, _)| *index);
        (scored.into_iter().map(|(_, m)| m).collect(), failed)
    }

    /// Rank every candidate in `resumes_dir` against `jobs_path`, which is
    /// either a single job file or a directory of them.
    ///
    /// Each job's ranking is stored under its file stem. A job that fails is
    /// logged and the run moves on to the next one.
    pub async fn rank_directory(&self, resumes_dir: &Path, jobs_path: &Path) -> Result<Vec<RankingReport>, RankerError> {
        let candidates: Vec<Candidate> = read_records::<Candidate>(resumes_dir)
            .await?
            .into_iter()
            .map(|(path, mut candidate)| {
                if candidate.filename.trim().is_empty() {
                    candidate.filename = file_stem(&path);
                }
                candidate
            })
            .collect();

        let jobs: Vec<(PathBuf, JobRequirements)> = if jobs_path.is_file() {
            vec![(jobs_path.to_path_buf(), read_record(jobs_path).await?)]
        } else {
            read_records(jobs_path).await?
        };

        tracing::info!(
            candidates = candidates.len(),
            jobs = jobs.len(),
            "Starting ranking run"
        );

        let pb = ProgressBar::new(jobs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{pos}/{len}] {msg} [{elapsed_precise} / {eta_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut reports = Vec::with_capacity(jobs.len());
        for (path, job) in jobs {
            let job_id = file_stem(&path);
            let job_file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| job_id.clone());
            pb.set_message(job_id.clone());

            match self.rank_job(&job_id, &job_file_name, &job, candidates.clone()).await {
                Ok(report) => {
                    tracing::info!(
                        job_id = %report.job_id,
                        scored = report.scored,
                        skipped = report.skipped,
                        failed = report.failed,
                        total = report.total,
                        "Job ranked"
                    );
                    reports.push(report);
                }
                Err(e) => {
                    tracing::error!(job_id = %job_id, error = %e, "Failed to rank job, continuing");
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(reports)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse one JSON record.
pub async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T, RankerError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RankerError::not_found(path.display().to_string()));
        }
        Err(e) => return Err(RankerError::Storage(format!("Failed to read {}: {}", path.display(), e))),
    };
    serde_json::from_str(&raw).map_err(|e| RankerError::Serialization(format!("{}: {}", path.display(), e)))
}

/// Every `*.json` record in `dir`, sorted by path. Files that fail to parse
/// are logged and skipped.
pub async fn read_records<T: DeserializeOwned>(dir: &Path) -> Result<Vec<(PathBuf, T)>, RankerError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(RankerError::not_found(dir.display().to_string()));
        }
        Err(e) => return Err(RankerError::Storage(format!("Failed to list {}: {}", dir.display(), e))),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match read_record::<T>(&path).await {
            Ok(record) => records.push((path, record)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable record"),
        }
    }
    Ok(records)
}
