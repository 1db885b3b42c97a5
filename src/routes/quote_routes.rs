use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::controllers::location_controller::{get_location, list_locations};
use crate::controllers::quote_controller::{create_quote, get_engine_config, health};
use crate::controllers::registration_controller::register;
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health",            get(health))
        .route("/locations",         get(list_locations))
        .route("/locations/{name}",  get(get_location))
        .route("/quotes",            post(create_quote))
        .route("/registrations",     post(register))
        .route("/engine/config",     get(get_engine_config))
        .with_state(state)
}

/// Full application: API, Scalar UI and the static front-end as fallback.
pub fn app_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
