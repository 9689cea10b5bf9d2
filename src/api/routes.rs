use axum::{
    routing::{get, post},
    Router,
    extract::{Form, Json, State},
    response::{Html, IntoResponse},
};
use tower_http::cors::{CorsLayer, Any};
use tracing::info;

use crate::api::models::SummarizeInput;
use crate::api::{page, response};
use crate::controller::Outcome;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/summarize", post(summarize_form_handler))
        .route("/api/summarize", post(summarize_api_handler))
        .route("/health", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

pub async fn index_handler() -> Html<String> {
    Html(page::render("", None))
}

pub async fn health_handler() -> &'static str {
    "ok"
}

pub async fn summarize_form_handler(
    State(state): State<AppState>,
    Form(input): Form<SummarizeInput>,
) -> impl IntoResponse {
    let url = input.url.clone();
    let outcome = run(&state, input).await;
    let status = outcome.status_code();
    (status, Html(page::render(&url, Some(&outcome))))
}

pub async fn summarize_api_handler(
    State(state): State<AppState>,
    Json(input): Json<SummarizeInput>,
) -> impl IntoResponse {
    let outcome = run(&state, input).await;
    response::from_outcome(outcome)
}

async fn run(state: &AppState, input: SummarizeInput) -> Outcome {
    info!(url = %input.url, "Processing summarize request");
    let start_time = std::time::Instant::now();
    let outcome = state.pipeline.run_guarded(input.into()).await;
    info!(state = ?outcome.state(), elapsed = ?start_time.elapsed(), "Request processed");
    outcome
}
