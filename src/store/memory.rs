use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::QuizError;
use crate::models::{AnswerFeedback, NewQuiz, Quiz, QuizResult, QuizView};
use crate::telemetry;

use super::{new_quiz_id, QuizStore};

#[derive(Default)]
struct State {
    quizzes: HashMap<String, Quiz>,
    results: HashMap<(String, String), QuizResult>,
}

/// Keeps everything in process memory. Submissions hold the write lock for the whole
/// lookup-grade-append step so concurrent answers for one user cannot lose a score bump.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    #[tracing::instrument(skip_all)]
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<String, QuizError> {
        let quiz = quiz.into_quiz(new_quiz_id())?;
        let id = quiz.id.clone();
        let questions = quiz.questions.len();
        self.state.write().await.quizzes.insert(id.clone(), quiz);
        tracing::info!(quiz_id = %id, questions, "Quiz created");
        telemetry::QUIZZES_CNTR.inc();
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn get_quiz(&self, quiz_id: &str) -> Result<QuizView, QuizError> {
        let state = self.state.read().await;
        state
            .quizzes
            .get(quiz_id)
            .map(QuizView::from)
            .ok_or(QuizError::NotFound("Quiz"))
    }

    #[tracing::instrument(skip(self))]
    async fn submit_answer(
        &self,
        quiz_id: &str,
        question_id: &str,
        selected_option: i64,
        user_id: &str,
    ) -> Result<AnswerFeedback, QuizError> {
        let mut state = self.state.write().await;
        let quiz = state
            .quizzes
            .get(quiz_id)
            .ok_or(QuizError::NotFound("Quiz"))?;
        let question = quiz
            .question(question_id)
            .ok_or(QuizError::NotFound("Question"))?;
        let answer = question.grade(selected_option)?;
        let feedback = question.feedback(&answer);

        state
            .results
            .entry((quiz_id.to_owned(), user_id.to_owned()))
            .or_insert_with(|| QuizResult::new(quiz_id, user_id))
            .record(answer);

        telemetry::record_answer(feedback.is_correct);
        tracing::info!(is_correct = feedback.is_correct, "Answer recorded");
        Ok(feedback)
    }

    #[tracing::instrument(skip(self))]
    async fn get_results(&self, quiz_id: &str, user_id: &str) -> Result<QuizResult, QuizError> {
        let state = self.state.read().await;
        state
            .results
            .get(&(quiz_id.to_owned(), user_id.to_owned()))
            .cloned()
            .ok_or(QuizError::NotFound("Results"))
    }
}
