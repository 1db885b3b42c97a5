use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::location::LocationProfile;
use crate::models::project::SizingResult;

fn default_self_consumption_percent() -> f64 { 60.0 }
fn default_claims_tax_incentive() -> bool { true }

// ─── Quote request ───────────────────────────────────────────────────────────

/// How the customer reports consumption: one average, or the last 12 bills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionInput {
    /// Average monthly consumption (kWh)
    Average(f64),
    /// Twelve monthly readings (kWh), averaged
    Monthly(Vec<f64>),
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequest {
    #[serde(default)]
    pub client_name: Option<String>,
    /// Capital city; absent means nothing was selected yet
    #[serde(default)]
    pub city: Option<String>,
    pub consumption: ConsumptionInput,
    /// Energy tariff from the bill (COP/kWh)
    pub tariff_per_kwh: f64,
    /// Share of generation used during the day, 0–100
    #[serde(default = "default_self_consumption_percent")]
    pub self_consumption_percent: f64,
    /// Income-tax filer (enables the Law 1715 benefit)
    #[serde(default = "default_claims_tax_incentive")]
    pub claims_tax_incentive: bool,
}

// ─── Quote report ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InverterPhase {
    SinglePhase,
    ThreePhase,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InverterSuggestion {
    pub phase: InverterPhase,
    pub voltage: String,
    pub capacity_kw: f64,
}

/// Current bill against the bill once solar offsets part of it (COP/month).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct BillComparison {
    pub current_monthly_bill: f64,
    /// Floored at zero
    pub monthly_bill_with_solar: f64,
    pub monthly_savings: f64,
    /// Bill minus monthly energy savings, unclamped; negative means a credit
    pub net_monthly_balance: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuoteReport {
    pub generated_at: DateTime<Utc>,
    pub client_name: Option<String>,
    pub location: LocationProfile,
    /// Consumption used for sizing, after averaging monthly readings (kWh)
    pub monthly_consumption_kwh: f64,
    pub sizing: SizingResult,
    pub inverter: InverterSuggestion,
    pub bill: BillComparison,
}

// ─── Registration gate ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    /// Mobile / WhatsApp number, 10 digits
    pub phone: String,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub registration_id: Uuid,
    pub client_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    /// Presentation layer may reveal the full report
    pub unlocked: bool,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

// ─── Service info ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub locations: usize,
}
