/// Embedding provider trait and supporting types
///
/// Provides a pluggable interface for text embedding generation.
/// Supports local fastembed models (default, no API key) and the OpenAI API.
/// Providers are initialised once per process and shared behind an `Arc`.

pub mod local;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::EmbeddingConfig;

/// Errors that can occur during embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// fastembed model initialization failure
    #[error("Model initialization error: {0}")]
    ModelInit(String),

    /// Embedding generation failure (inference error)
    #[error("Embedding generation error: {0}")]
    Generation(String),

    /// API provider returned an HTTP error
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Provider not configured (e.g., missing API key)
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Core trait for embedding text into fixed-dimension float vectors.
///
/// Implementations must be Send + Sync to support use in async contexts
/// and across thread boundaries (e.g., Arc<dyn EmbeddingProvider>).
/// Identical input must produce identical vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Return the model name identifier (e.g., "all-MiniLM-L6-v2").
    fn model_name(&self) -> &str;

    /// Return the dimension of the embedding vectors produced by this model.
    fn dimension(&self) -> usize;
}

/// Create the embedding provider selected by configuration.
pub async fn create_provider(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    match config.provider.as_str() {
        "openai" => {
            let api_key = config.openai_api_key.clone().ok_or_else(|| {
                EmbeddingError::NotConfigured(
                    "OpenAI API key required when provider is 'openai'. \
                     Set RANKER_EMBEDDING__OPENAI_API_KEY or embedding.openai_api_key in resume-ranker.toml"
                        .to_string(),
                )
            })?;
            Ok(Arc::new(openai::OpenAIEmbeddingProvider::new(
                api_key,
                config.openai_model.clone(),
            )?))
        }
        "local" => Ok(Arc::new(local::LocalEmbeddingProvider::new(&config.cache_dir).await?)),
        other => Err(EmbeddingError::NotConfigured(format!(
            "Unknown embedding provider '{}': expected 'local' or 'openai'",
            other
        ))),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic bag-of-words provider for tests: no model download.

    use super::*;

    /// Hashes each lower-cased word into one of `dim` buckets. Texts sharing
    /// words get positive cosine similarity; identical texts get 1.0.
    pub struct HashingProvider {
        pub dim: usize,
    }

    impl Default for HashingProvider {
        fn default() -> Self {
            HashingProvider { dim: 64 }
        }
    }

    fn bucket(word: &str, dim: usize) -> usize {
        // FNV-1a
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in word.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (hash % dim as u64) as usize
    }

    #[async_trait]
    impl EmbeddingProvider for HashingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            let mut v = vec![0.0f32; self.dim];
            for word in text.split_whitespace() {
                v[bucket(&word.to_lowercase(), self.dim)] += 1.0;
            }
            Ok(v)
        }

        fn model_name(&self) -> &str {
            "hashing-test"
        }

        fn dimension(&self) -> usize {
            self.dim
        }
    }

    /// Fails every call whose text contains `trigger`.
    pub struct FailingProvider {
        pub inner: HashingProvider,
        pub trigger: String,
    }

    #[async_trait]
    impl EmbeddingProvider for FailingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            if text.contains(&self.trigger) {
                return Err(EmbeddingError::Generation(format!("refusing to embed '{}'", text)));
            }
            self.inner.embed(text).await
        }

        fn model_name(&self) -> &str {
            "failing-test"
        }

        fn dimension(&self) -> usize {
            self.inner.dim
        }
    }
}
