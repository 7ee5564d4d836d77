use serde::Serialize;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::Answer;

/// One stored submission, as exported by the CLI.
#[derive(sqlx::FromRow, Serialize)]
pub struct ResultRow {
    pub quiz_id: String,
    pub user_id: String,
    pub question_id: String,
    pub selected_option: i64,
    pub is_correct: bool,
}

#[derive(sqlx::FromRow)]
struct AnswerRow {
    question_id: String,
    selected_option: i64,
    is_correct: bool,
}

pub async fn insert_answer<'c>(
    executor: impl SqliteExecutor<'c>,
    quiz_id: &str,
    user_id: &str,
    answer: &Answer,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
INSERT INTO results (quiz_id, user_id, question_id, selected_option, is_correct)
VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(quiz_id)
    .bind(user_id)
    .bind(&answer.question_id)
    .bind(answer.selected_option)
    .bind(answer.is_correct)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_answers(
    pool: &SqlitePool,
    quiz_id: &str,
    user_id: &str,
) -> sqlx::Result<Vec<Answer>> {
    let rows = sqlx::query_as::<_, AnswerRow>(
        r#"
        SELECT question_id, selected_option, is_correct FROM results
        WHERE results.quiz_id = ?1 AND results.user_id = ?2
        ORDER BY id
        "#,
    )
    .bind(quiz_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Answer {
            question_id: r.question_id,
            selected_option: r.selected_option,
            is_correct: r.is_correct,
        })
        .collect())
}

pub async fn all_results(pool: &SqlitePool) -> sqlx::Result<Vec<ResultRow>> {
    sqlx::query_as::<_, ResultRow>(
        r#"
        SELECT quiz_id, user_id, question_id, selected_option, is_correct FROM results
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}
