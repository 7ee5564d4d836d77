use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::QuizError;
use crate::models::Question;

#[derive(sqlx::FromRow)]
pub struct QuizRow {
    pub id: String,
    pub title: String,
}

#[derive(sqlx::FromRow)]
pub struct QuestionRow {
    pub id: String,
    pub text: String,
    /// JSON encoded list of option strings.
    pub options: String,
    pub correct_option: i64,
}

impl TryFrom<QuestionRow> for Question {
    type Error = QuizError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.id,
            text: row.text,
            options: serde_json::from_str(&row.options)?,
            correct_option: row.correct_option,
        })
    }
}

pub async fn insert_quiz<'c>(
    executor: impl SqliteExecutor<'c>,
    id: &str,
    title: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
INSERT INTO quizzes (id, title) VALUES (?1, ?2)
        "#,
    )
    .bind(id)
    .bind(title)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn insert_question<'c>(
    executor: impl SqliteExecutor<'c>,
    quiz_id: &str,
    position: i64,
    question: &Question,
) -> Result<(), QuizError> {
    let options = serde_json::to_string(&question.options)?;
    sqlx::query(
        r#"
INSERT INTO questions (id, quiz_id, position, text, options, correct_option)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&question.id)
    .bind(quiz_id)
    .bind(position)
    .bind(&question.text)
    .bind(options)
    .bind(question.correct_option)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_quiz(pool: &SqlitePool, id: &str) -> sqlx::Result<Option<QuizRow>> {
    sqlx::query_as::<_, QuizRow>(
        r#"
        SELECT id, title FROM quizzes WHERE quizzes.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions(pool: &SqlitePool, quiz_id: &str) -> sqlx::Result<Vec<QuestionRow>> {
    sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, text, options, correct_option FROM questions
        WHERE questions.quiz_id = ?1
        ORDER BY position
        "#,
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

pub async fn get_question(
    pool: &SqlitePool,
    quiz_id: &str,
    question_id: &str,
) -> sqlx::Result<Option<QuestionRow>> {
    sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, text, options, correct_option FROM questions
        WHERE questions.quiz_id = ?1 AND questions.id = ?2
        "#,
    )
    .bind(quiz_id)
    .bind(question_id)
    .fetch_optional(pool)
    .await
}
