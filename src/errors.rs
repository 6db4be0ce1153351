/// Domain-specific error types for resume-ranker
///
/// Only hard failures live here. Missing job-side or candidate-side data is
/// not an error: it is carried as a score (see `scoring::score`).

#[derive(Debug, thiserror::Error)]
pub enum RankerError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>
    },

    #[error("Not found: {id}")]
    NotFound {
        id: String
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] crate::embedding::EmbeddingError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for RankerError {
    fn from(e: std::io::Error) -> Self {
        RankerError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for RankerError {
    fn from(e: serde_json::Error) -> Self {
        RankerError::Serialization(e.to_string())
    }
}

impl RankerError {
    /// Helper to create validation errors with field names
    ///
    /// Example:
    /// ```
    /// use resume_ranker::errors::RankerError;
    /// let err = RankerError::validation("filename", "Candidate has no merge key");
    /// ```
    pub fn validation(field: &str, message: &str) -> Self {
        RankerError::Validation {
            message: message.to_string(),
            field: Some(field.to_string()),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        RankerError::NotFound { id: id.into() }
    }
}
