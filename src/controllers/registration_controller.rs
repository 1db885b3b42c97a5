use axum::{extract::State, http::StatusCode, Json};

use crate::error::ApiError;
use crate::models::quote::{RegistrationRequest, RegistrationResponse};
use crate::services::registration;
use crate::shared_state::AppState;

/// POST /api/registrations
/// Register contact details and unlock the report
///
/// Validates name, email, a 10-digit phone number and the selected city.
/// The registration is not stored; the caller keeps the `unlocked` flag.
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Registration accepted", body = RegistrationResponse),
        (status = 422, description = "One or more fields are invalid")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let registration = registration::register(&request, &state.locations).inspect_err(|e| {
        tracing::warn!(error = %e, "registration rejected");
    })?;
    tracing::info!(
        registration_id = %registration.registration_id,
        city = %registration.city,
        "registration accepted"
    );
    Ok((StatusCode::CREATED, Json(registration)))
}
