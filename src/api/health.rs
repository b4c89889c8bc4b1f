use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::{error, warn};

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) struct HealthReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl HealthReport {
    fn ready(detail: Option<String>) -> Self {
        Self {
            status: "ready",
            detail,
        }
    }

    fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: "degraded",
            detail: Some(detail.into()),
        }
    }
}

/// Ready as long as the store answers. A summarizer outage is only reported,
/// since ingestion falls back without it.
pub(crate) async fn ready(
    State(state): State<AppState>,
) -> Result<Json<HealthReport>, (StatusCode, Json<HealthReport>)> {
    state.telemetry().record_ready_probe();

    if let Err(error) = state.store().ping().await {
        error!(%error, "article store readiness check failed");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthReport::degraded(format!("article_store: {error}"))),
        ));
    }

    let detail = match state.summarizer().check_reachable().await {
        Ok(()) => None,
        Err(error) => {
            warn!(error = %format!("{error:#}"), "summarizer readiness check failed");
            Some(format!("summarizer: {error:#}"))
        }
    };

    Ok(Json(HealthReport::ready(detail)))
}

pub(crate) async fn live(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_live_probe();
    Json(HealthReport {
        status: "live",
        detail: None,
    })
}
