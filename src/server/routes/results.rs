use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::{models::QuizResult, server::app::AppState, store::SharedStore};

use super::ApiResponse;

async fn get_results(
    State(store): State<SharedStore>,
    Path((quiz_id, user_id)): Path<(String, String)>,
) -> ApiResponse<Json<QuizResult>> {
    Ok(Json(store.get_results(&quiz_id, &user_id).await?))
}

pub fn results_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes/{quiz_id}/results/{user_id}", get(get_results))
        .with_state(state)
}
