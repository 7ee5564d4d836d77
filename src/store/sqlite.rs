use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::queries::{quizzes, results};
use crate::error::QuizError;
use crate::models::{AnswerFeedback, NewQuiz, Question, Quiz, QuizResult, QuizView};
use crate::telemetry;

use super::{new_quiz_id, QuizStore};

/// Durable backend over the `quizzes`, `questions` and `results` tables.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load_quiz(&self, quiz_id: &str) -> Result<Quiz, QuizError> {
        let row = quizzes::get_quiz(&self.pool, quiz_id)
            .await?
            .ok_or(QuizError::NotFound("Quiz"))?;
        let questions = quizzes::get_questions(&self.pool, quiz_id)
            .await?
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Quiz {
            id: row.id,
            title: row.title,
            questions,
        })
    }
}

#[async_trait]
impl QuizStore for SqliteStore {
    #[tracing::instrument(skip_all)]
    async fn create_quiz(&self, quiz: NewQuiz) -> Result<String, QuizError> {
        let quiz = quiz.into_quiz(new_quiz_id())?;

        let mut tx = self.pool.begin().await?;
        quizzes::insert_quiz(&mut *tx, &quiz.id, &quiz.title).await?;
        for (n, question) in quiz.questions.iter().enumerate() {
            quizzes::insert_question(&mut *tx, &quiz.id, n as i64 + 1, question).await?;
        }
        tx.commit().await?;

        tracing::info!(quiz_id = %quiz.id, questions = quiz.questions.len(), "Quiz created");
        telemetry::QUIZZES_CNTR.inc();
        Ok(quiz.id)
    }

    #[tracing::instrument(skip(self))]
    async fn get_quiz(&self, quiz_id: &str) -> Result<QuizView, QuizError> {
        let quiz = self.load_quiz(quiz_id).await?;
        Ok(QuizView::from(&quiz))
    }

    #[tracing::instrument(skip(self))]
    async fn submit_answer(
        &self,
        quiz_id: &str,
        question_id: &str,
        selected_option: i64,
        user_id: &str,
    ) -> Result<AnswerFeedback, QuizError> {
        quizzes::get_quiz(&self.pool, quiz_id)
            .await?
            .ok_or(QuizError::NotFound("Quiz"))?;
        let question = quizzes::get_question(&self.pool, quiz_id, question_id)
            .await?
            .ok_or(QuizError::NotFound("Question"))
            .and_then(Question::try_from)?;

        let answer = question.grade(selected_option)?;
        results::insert_answer(&self.pool, quiz_id, user_id, &answer).await?;

        let feedback = question.feedback(&answer);
        telemetry::record_answer(feedback.is_correct);
        tracing::info!(is_correct = feedback.is_correct, "Answer recorded");
        Ok(feedback)
    }

    /// Score is always recomputed from the stored rows, never cached.
    #[tracing::instrument(skip(self))]
    async fn get_results(&self, quiz_id: &str, user_id: &str) -> Result<QuizResult, QuizError> {
        let answers = results::get_answers(&self.pool, quiz_id, user_id).await?;
        if answers.is_empty() {
            return Err(QuizError::NotFound("Results"));
        }
        Ok(QuizResult::from_answers(quiz_id, user_id, answers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::NewQuestion;
    use tempfile::TempDir;

    async fn store() -> (SqliteStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.db");
        let pool = db::establish_connection(path.to_str().unwrap())
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        (SqliteStore::new(pool), dir)
    }

    fn general_knowledge() -> NewQuiz {
        NewQuiz {
            title: Some("General Knowledge Quiz".to_owned()),
            questions: Some(vec![
                NewQuestion {
                    text: "What is the capital of France?".to_owned(),
                    options: ["Berlin", "Madrid", "Paris", "Rome"]
                        .iter()
                        .map(|o| o.to_string())
                        .collect(),
                    correct_option: 2,
                },
                NewQuestion {
                    text: "Who wrote 'Hamlet'?".to_owned(),
                    options: [
                        "Charles Dickens",
                        "William Shakespeare",
                        "Mark Twain",
                        "Jane Austen",
                    ]
                    .iter()
                    .map(|o| o.to_string())
                    .collect(),
                    correct_option: 1,
                },
            ]),
        }
    }

    #[tokio::test]
    async fn quiz_round_trips_through_tables() {
        let (store, _dir) = store().await;
        let id = store.create_quiz(general_knowledge()).await.unwrap();

        let quiz = store.get_quiz(&id).await.unwrap();
        assert_eq!(quiz.title, "General Knowledge Quiz");
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].id, format!("{id}-q1"));
        assert_eq!(quiz.questions[1].options[1], "William Shakespeare");
    }

    #[tokio::test]
    async fn rejected_quiz_leaves_no_rows() {
        let (store, _dir) = store().await;
        let mut quiz = general_knowledge();
        quiz.questions.as_mut().unwrap()[1].options.truncate(2);
        assert!(matches!(
            store.create_quiz(quiz).await,
            Err(QuizError::Validation(_))
        ));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quizzes")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn failed_question_insert_rolls_back_quiz() {
        let (store, _dir) = store().await;
        sqlx::query(
            r#"
CREATE TRIGGER reject_questions BEFORE INSERT ON questions
BEGIN
    SELECT RAISE(ABORT, 'questions are read-only');
END
            "#,
        )
        .execute(store.pool())
        .await
        .unwrap();

        assert!(matches!(
            store.create_quiz(general_knowledge()).await,
            Err(QuizError::Database(_))
        ));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quizzes")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn submissions_accumulate_and_score_is_recomputed() {
        let (store, _dir) = store().await;
        let id = store.create_quiz(general_knowledge()).await.unwrap();
        let q1 = format!("{id}-q1");
        let q2 = format!("{id}-q2");

        let feedback = store.submit_answer(&id, &q1, 2, "user456").await.unwrap();
        assert!(feedback.is_correct);
        let feedback = store.submit_answer(&id, &q2, 0, "user456").await.unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct_option, 1);

        let result = store.get_results(&id, "user456").await.unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.answers.len(), 2);
        assert_eq!(result.answers[0].question_id, q1);

        store.submit_answer(&id, &q1, 2, "user456").await.unwrap();
        let result = store.get_results(&id, "user456").await.unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.answers.len(), 3);
    }

    #[tokio::test]
    async fn lookups_miss_with_not_found() {
        let (store, _dir) = store().await;
        let id = store.create_quiz(general_knowledge()).await.unwrap();

        assert!(matches!(
            store.get_quiz("missing").await,
            Err(QuizError::NotFound("Quiz"))
        ));
        assert!(matches!(
            store.submit_answer(&id, &format!("{id}-q9"), 0, "u").await,
            Err(QuizError::NotFound("Question"))
        ));
        assert!(matches!(
            store.get_results(&id, "u").await,
            Err(QuizError::NotFound("Results"))
        ));
    }

    #[tokio::test]
    async fn question_of_another_quiz_is_not_found() {
        let (store, _dir) = store().await;
        let first = store.create_quiz(general_knowledge()).await.unwrap();
        let second = store.create_quiz(general_knowledge()).await.unwrap();
        assert!(matches!(
            store
                .submit_answer(&second, &format!("{first}-q1"), 2, "u")
                .await,
            Err(QuizError::NotFound("Question"))
        ));
    }
}
