//! The `QuizStore` seam: every state transition of the service goes through one of
//! these four operations, whichever backend holds the data.

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::QuizError;
use crate::models::{AnswerFeedback, NewQuiz, QuizResult, QuizView};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type SharedStore = Arc<dyn QuizStore>;

#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Validates and stores a quiz, returning its freshly generated id.
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<String, QuizError>;

    async fn get_quiz(&self, quiz_id: &str) -> Result<QuizView, QuizError>;

    /// Grades and appends one answer to the `(quiz_id, user_id)` result. Repeated
    /// answers to the same question are kept, not replaced.
    async fn submit_answer(
        &self,
        quiz_id: &str,
        question_id: &str,
        selected_option: i64,
        user_id: &str,
    ) -> Result<AnswerFeedback, QuizError>;

    async fn get_results(&self, quiz_id: &str, user_id: &str) -> Result<QuizResult, QuizError>;
}

pub(crate) fn new_quiz_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
