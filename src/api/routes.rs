use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
    http::StatusCode,
};
use tower_http::cors::{CorsLayer, Any};
use tracing::info;

use crate::api::models::{ExtractRequest, ExtractResponse, SummarizeRequest, SummarizeResponse};
use crate::error::AppError;
use crate::extract::extract_chat;
use crate::llm::{build_prompt, clip_chat_text, SummaryStyle};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/extract", post(extract_handler))
        .route("/api/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn liveness_handler() -> &'static str {
    "Scraper backend is running."
}

async fn extract_handler(
    State(state): State<AppState>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let Some(url) = req.url() else {
        return Err(AppError::InvalidUrl(
            "Invalid or unsupported chat link.".to_string(),
        ));
    };

    info!(url, "received extraction request");
    let start = std::time::Instant::now();

    let content = extract_chat(&state, url).await?;

    info!(
        url,
        elapsed_ms = start.elapsed().as_millis() as u64,
        chars = content.chars().count(),
        "extraction finished"
    );
    Ok(Json(ExtractResponse { content }))
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> (StatusCode, Json<SummarizeResponse>) {
    let (Some(chat_text), Some(style_raw)) = (req.chat_text(), req.summary_type()) else {
        return summary_reply(StatusCode::BAD_REQUEST, "Missing chat text or summary type.");
    };

    let style = SummaryStyle::from_request(style_raw);
    let clipped = clip_chat_text(chat_text, state.config.summary_max_chars);
    let prompt = build_prompt(style, &clipped);

    info!(
        style = ?style,
        prompt_chars = prompt.chars().count(),
        "received summarize request"
    );

    match state.llm.complete(&prompt).await {
        Ok(summary) => (StatusCode::OK, Json(SummarizeResponse { summary })),
        Err(err) => {
            tracing::error!(error = %err, "summarization failed");
            let message = match err {
                AppError::Config(_) => "Server error: API key missing.",
                _ => "Failed to generate summary.",
            };
            summary_reply(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

// Failures ride in the `summary` field; the form client renders that field
// verbatim whatever the status code. Kept for wire compatibility.
fn summary_reply(status: StatusCode, message: &str) -> (StatusCode, Json<SummarizeResponse>) {
    (
        status,
        Json(SummarizeResponse {
            summary: message.to_string(),
        }),
    )
}
