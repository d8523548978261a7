use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::question::{QuestionQuery, QuestionView},
    error::AppError,
    services::question_service,
    state::SharedState,
};

/// Routes exposing the question pool directly.
pub fn router() -> Router<SharedState> {
    Router::new().route("/questions/random", get(random_question))
}

/// Sample one question uniformly from the pool.
#[utoipa::path(
    get,
    path = "/questions/random",
    tag = "question",
    params(QuestionQuery),
    responses(
        (status = 200, description = "A randomly chosen question", body = QuestionView),
        (status = 404, description = "No question matches the filters")
    )
)]
pub async fn random_question(
    State(state): State<SharedState>,
    Query(query): Query<QuestionQuery>,
) -> Result<Json<QuestionView>, AppError> {
    let question = question_service::random_question(&state, &query)?;
    Ok(Json(question))
}
