use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use tracing::{info, warn};

use super::ErrorResponse;
use crate::app::AppState;
use crate::ingest::ArticleSubmission;
use crate::store::Article;

#[derive(Debug, Serialize)]
struct CreateArticleResponse {
    message: &'static str,
    data: Article,
    title: String,
}

#[derive(Debug, Serialize)]
struct ListArticlesResponse {
    data: Vec<Article>,
}

/// POST /articles
pub(crate) async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<ArticleSubmission>, JsonRejection>,
) -> impl IntoResponse {
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejected malformed article submission");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!(
                    "invalid request body: {}",
                    rejection.body_text()
                ))),
            )
                .into_response();
        }
    };

    info!(
        source_url = %submission.url,
        has_content = !submission.content.is_empty(),
        "article submission received"
    );

    match state.orchestrator().ingest(submission).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(CreateArticleResponse {
                message: "Article created successfully",
                data: receipt.article,
                title: receipt.title,
            }),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(error.to_string())),
        )
            .into_response(),
    }
}

/// GET /articles
pub(crate) async fn list_articles(State(state): State<AppState>) -> impl IntoResponse {
    match state.listing().list_all().await {
        Ok(data) => (StatusCode::OK, Json(ListArticlesResponse { data })).into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(error.to_string())),
        )
            .into_response(),
    }
}
