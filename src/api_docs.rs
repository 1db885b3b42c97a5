use utoipa::OpenApi;
use crate::config;
use crate::controllers::{location_controller, quote_controller, registration_controller};
use crate::models::{location, project, quote};
use crate::services::pricing;

#[derive(OpenApi)]
#[openapi(
    paths(
        location_controller::list_locations,
        location_controller::get_location,
        quote_controller::create_quote,
        quote_controller::get_engine_config,
        quote_controller::health,
        registration_controller::register
    ),
    components(
        schemas(
            location::LocationProfile,
            project::ProjectInput,
            project::SizingResult,
            project::CashFlowPoint,
            project::EnvironmentalImpact,
            quote::QuoteRequest,
            quote::ConsumptionInput,
            quote::QuoteReport,
            quote::InverterSuggestion,
            quote::InverterPhase,
            quote::BillComparison,
            quote::RegistrationRequest,
            quote::RegistrationResponse,
            quote::FieldError,
            quote::HealthStatus,
            config::EngineConfig,
            config::CapacityBasis,
            pricing::PricingModel,
            pricing::PriceTier
        )
    ),
    tags(
        (name = "solar-expert", description = "Solar PV sizing and financial feasibility API")
    )
)]
pub struct ApiDoc;
