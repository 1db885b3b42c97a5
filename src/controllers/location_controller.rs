use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::ApiError;
use crate::models::location::LocationProfile;
use crate::shared_state::AppState;

/// GET /api/locations
/// List supported locations
///
/// Returns every capital city with its average daily peak sun hours (HSP).
#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "Supported locations", body = Vec<LocationProfile>)
    )
)]
pub async fn list_locations(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.locations.all().to_vec())
}

/// GET /api/locations/{name}
/// Get a single location
///
/// Lookup ignores case and surrounding whitespace.
#[utoipa::path(
    get,
    path = "/api/locations/{name}",
    params(
        ("name" = String, Path, description = "City name, e.g. Bogotá")
    ),
    responses(
        (status = 200, description = "Location radiation profile", body = LocationProfile),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LocationProfile>, ApiError> {
    state
        .locations
        .find(&name)
        .cloned()
        .map(Json)
        .ok_or(ApiError::LocationNotFound(name))
}
