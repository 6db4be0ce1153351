use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resume_ranker::config::Config;
use resume_ranker::embedding::create_provider;
use resume_ranker::fuzzy::FuzzyMatcher;
use resume_ranker::logging;
use resume_ranker::model::{Candidate, JobRequirements};
use resume_ranker::pipeline::{read_record, Ranker};
use resume_ranker::ranking::file::FileRankingStore;
use resume_ranker::ranking::memory::InMemoryRankingStore;
use resume_ranker::ranking::RankingStore;
use resume_ranker::scoring::CategoryScoreCalculator;
use resume_ranker::semantic::SemanticScorer;

#[derive(Parser)]
#[command(name = "resume-ranker", version, about = "Rank resumes against job descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every resume against one job file or a directory of jobs
    Rank {
        /// Directory of extracted resume JSON records
        #[arg(long)]
        resumes: PathBuf,
        /// Job JSON file, or a directory of them
        #[arg(long)]
        jobs: PathBuf,
        /// Where rankings are stored (overrides ranking.output_dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Score a single resume against a single job, without persisting
    Score {
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        job: PathBuf,
    },
    /// Print a stored ranking
    Show {
        /// Job id (the job file's stem)
        #[arg(long)]
        job: String,
        /// Only print the best N candidates
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn output_dir(config: &Config, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(&config.ranking.output_dir))
}

async fn build_ranker(config: &Config, store: Arc<dyn RankingStore>) -> Result<Ranker> {
    let provider = create_provider(&config.embedding)
        .await
        .context("Failed to initialize embedding provider")?;
    tracing::info!(
        provider = %config.embedding.provider,
        model = provider.model_name(),
        "Embedding provider ready"
    );
    let calculator = CategoryScoreCalculator::new(
        SemanticScorer::new(provider),
        FuzzyMatcher::default(),
        config.scoring.clone(),
    );
    Ok(Ranker::new(calculator, store, config.ranking.max_concurrency))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing resume-ranker.toml is fine; an invalid one is not
    let config = Config::load().context("Refusing to run with an invalid configuration")?;

    // stdout carries command output; logs go to stderr
    logging::init_logging(&config);

    match cli.command {
        Commands::Rank { resumes, jobs, output } => {
            let store = Arc::new(FileRankingStore::new(output_dir(&config, output))?);
            let ranker = build_ranker(&config, store).await?;
            let reports = ranker.rank_directory(&resumes, &jobs).await?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Commands::Score { resume, job } => {
            // Nothing is persisted for a single pair
            let ranker = build_ranker(&config, Arc::new(InMemoryRankingStore::new())).await?;
            let job: JobRequirements = read_record(&job).await?;
            let mut candidate: Candidate = read_record(&resume).await?;
            if candidate.filename.trim().is_empty() {
                candidate.filename = resume
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
            let result = ranker.score_pair(&job, &candidate).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Show { job, top, output } => {
            let store = FileRankingStore::open(output_dir(&config, output))?;
            let Some(mut result) = store.load(&job).await? else {
                let known = store.job_ids().await?;
                anyhow::bail!("No ranking stored for job '{}' (known: {})", job, known.join(", "));
            };
            if let Some(n) = top {
                result.candidates.candidates.truncate(n);
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
