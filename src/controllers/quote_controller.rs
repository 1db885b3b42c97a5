use axum::{extract::State, response::IntoResponse, Json};

use crate::config::EngineConfig;
use crate::error::ApiError;
use crate::models::quote::{HealthStatus, QuoteReport, QuoteRequest};
use crate::services::quote;
use crate::shared_state::AppState;

/// POST /api/quotes
/// Size a system and evaluate its economics
///
/// Resolves the city's peak sun hours, averages consumption when twelve
/// monthly readings are given, then returns the technical proposal, the
/// financial analysis with its 10-year cash flow, the bill comparison and the
/// environmental impact.
#[utoipa::path(
    post,
    path = "/api/quotes",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote report", body = QuoteReport),
        (status = 400, description = "Invalid input, or no/unknown city"),
        (status = 422, description = "Payback undefined: the system yields no savings"),
        (status = 500, description = "Engine configuration error")
    )
)]
pub async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteReport>, ApiError> {
    let config = &state.config;
    match quote::build_report(&request, &state.locations, &config.engine, &config.report) {
        Ok(report) => {
            tracing::info!(
                city = %report.location.name,
                capacity_kwp = report.sizing.installed_capacity_kwp,
                panels = report.sizing.panel_count,
                payback_years = report.sizing.payback_years,
                "quote generated"
            );
            Ok(Json(report))
        }
        Err(e) => {
            tracing::warn!(city = ?request.city, error = %e, "quote rejected");
            Err(e.into())
        }
    }
}

/// GET /api/engine/config
/// Get the active engine constants
///
/// Panel specs, buy-back rate, tax parameters and the pricing table in use.
#[utoipa::path(
    get,
    path = "/api/engine/config",
    responses(
        (status = 200, description = "Engine configuration", body = EngineConfig)
    )
)]
pub async fn get_engine_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.config.engine.clone())
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service status", body = HealthStatus)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        locations: state.locations.len(),
    })
}
