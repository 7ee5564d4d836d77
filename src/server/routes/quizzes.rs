use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    models::{AnswerFeedback, NewQuiz, QuizView, ANONYMOUS_USER},
    server::app::AppState,
    store::SharedStore,
};

use super::{ApiError, ApiResponse};

const USER_ID_HEADER: &str = "user-id";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedQuiz {
    quiz_id: String,
}

#[derive(Deserialize)]
struct Submission {
    selected_option: Option<i64>,
}

// header missing, empty or not valid UTF-8 all fall back to the anonymous user
fn user_id(headers: &HeaderMap) -> &str {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_USER)
}

async fn create_quiz(
    State(store): State<SharedStore>,
    payload: Result<Json<NewQuiz>, JsonRejection>,
) -> ApiResponse<(StatusCode, Json<CreatedQuiz>)> {
    let Json(new_quiz) = payload?;
    let quiz_id = store.create_quiz(new_quiz).await?;
    Ok((StatusCode::CREATED, Json(CreatedQuiz { quiz_id })))
}

async fn get_quiz(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> ApiResponse<Json<QuizView>> {
    Ok(Json(store.get_quiz(&id).await?))
}

async fn submit_answer(
    State(store): State<SharedStore>,
    Path((quiz_id, question_id)): Path<(String, String)>,
    headers: HeaderMap,
    payload: Result<Json<Submission>, JsonRejection>,
) -> ApiResponse<Json<AnswerFeedback>> {
    let Json(submission) = payload?;
    let selected_option = submission
        .selected_option
        .ok_or_else(|| ApiError::BadRequest("selected_option is required.".to_owned()))?;

    let feedback = store
        .submit_answer(&quiz_id, &question_id, selected_option, user_id(&headers))
        .await?;
    Ok(Json(feedback))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(create_quiz))
        .route("/quizzes/{id}", get(get_quiz))
        .route(
            "/quizzes/{quiz_id}/questions/{question_id}/answers",
            post(submit_answer),
        )
        .with_state(state)
}
