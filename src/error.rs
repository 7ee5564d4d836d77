use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("{0}")]
    Validation(String),

    /// Carries the kind of entity that was missing, e.g. "Quiz".
    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl QuizError {
    pub fn validation(message: impl Into<String>) -> Self {
        QuizError::Validation(message.into())
    }
}
