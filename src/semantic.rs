/// Semantic similarity over sentence embeddings.
///
/// Text is normalized before encoding; empty text has no embedding at all,
/// which is how "no data" reaches the cosine step.

use std::sync::Arc;

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::scoring::score::CategoryScore;
use crate::text::normalize;

/// Dense sentence embedding.
pub type Embedding = Vec<f32>;

/// Encodes text through a shared embedding provider.
#[derive(Clone)]
pub struct SemanticScorer {
    provider: Arc<dyn EmbeddingProvider>,
}

impl SemanticScorer {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        SemanticScorer { provider }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// `None` for text that normalizes to "", otherwise the provider's vector.
    pub async fn encode(&self, text: &str) -> Result<Option<Embedding>, EmbeddingError> {
        let text = normalize(text);
        if text.is_empty() {
            return Ok(None);
        }
        let vector = self.provider.embed(&text).await?;
        if vector.len() != self.provider.dimension() {
            return Err(EmbeddingError::Generation(format!(
                "{} returned {} dimensions, expected {}",
                self.provider.model_name(),
                vector.len(),
                self.provider.dimension()
            )));
        }
        Ok(Some(vector))
    }
}

/// Cosine similarity scaled to [-100, 100].
///
/// - no job-side vector: `NoReference`
/// - job-side vector but no candidate vector: neutral 50
pub fn cosine_similarity(job: Option<&[f32]>, candidate: Option<&[f32]>) -> CategoryScore {
    let Some(job) = job else {
        return CategoryScore::NoReference;
    };
    let Some(candidate) = candidate else {
        return CategoryScore::neutral();
    };

    let mut dot = 0.0f64;
    let mut norm_job = 0.0f64;
    let mut norm_candidate = 0.0f64;
    for (&a, &b) in job.iter().zip(candidate.iter()) {
        let (a, b) = (a as f64, b as f64);
        dot += a * b;
        norm_job += a * a;
        norm_candidate += b * b;
    }

    // Zero vectors carry no direction
    if norm_job == 0.0 || norm_candidate == 0.0 {
        return CategoryScore::Scored(0.0);
    }
    CategoryScore::Scored(dot / (norm_job.sqrt() * norm_candidate.sqrt()) * 100.0)
}
