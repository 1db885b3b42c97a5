use chrono::Utc;

use crate::config::{EngineConfig, ReportConfig};
use crate::error::EngineError;
use crate::models::location::LocationTable;
use crate::models::project::{ProjectInput, SizingResult};
use crate::models::quote::{
    BillComparison, ConsumptionInput, InverterPhase, InverterSuggestion, QuoteReport, QuoteRequest,
};
use crate::services::sizing_engine;

const MONTHS_PER_YEAR: usize = 12;

impl ConsumptionInput {
    /// Average monthly consumption (kWh).
    pub fn monthly_average(&self) -> Result<f64, EngineError> {
        match self {
            ConsumptionInput::Average(kwh) => Ok(*kwh),
            ConsumptionInput::Monthly(readings) => {
                if readings.len() != MONTHS_PER_YEAR {
                    return Err(EngineError::invalid_input(
                        "consumption",
                        format!("expected {MONTHS_PER_YEAR} monthly readings, got {}", readings.len()),
                    ));
                }
                if readings.iter().any(|kwh| !kwh.is_finite() || *kwh < 0.0) {
                    return Err(EngineError::invalid_input("consumption", "monthly readings must not be negative"));
                }
                Ok(readings.iter().sum::<f64>() / MONTHS_PER_YEAR as f64)
            }
        }
    }
}

/// Resolves the city, normalizes consumption and the self-consumption share,
/// runs the engine and dresses the result up as a customer-facing quote.
pub fn build_report(
    request: &QuoteRequest,
    locations: &LocationTable,
    engine: &EngineConfig,
    report: &ReportConfig,
) -> Result<QuoteReport, EngineError> {
    let city = request
        .city
        .as_deref()
        .ok_or_else(|| EngineError::invalid_input("city", "no location selected"))?;
    let location = locations
        .find(city)
        .ok_or_else(|| EngineError::invalid_input("city", format!("unknown location `{city}`")))?;

    let percent = request.self_consumption_percent;
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(EngineError::invalid_input("self_consumption_percent", "must be between 0 and 100"));
    }

    let monthly_consumption_kwh = request.consumption.monthly_average()?;
    let input = ProjectInput {
        monthly_consumption_kwh,
        tariff_per_kwh: request.tariff_per_kwh,
        self_consumption_ratio: percent / 100.0,
        claims_tax_incentive: request.claims_tax_incentive,
        peak_sun_hours: location.peak_sun_hours,
    };
    let sizing = sizing_engine::compute(&input, engine)?;

    Ok(QuoteReport {
        generated_at: Utc::now(),
        client_name: request.client_name.clone(),
        location: location.clone(),
        monthly_consumption_kwh,
        inverter: suggest_inverter(&sizing, engine, report),
        bill: compare_bill(&input, &sizing),
        sizing,
    })
}

/// Single-phase for small residential systems, three-phase above the
/// configured threshold. The inverter matches the array capacity.
pub fn suggest_inverter(sizing: &SizingResult, engine: &EngineConfig, report: &ReportConfig) -> InverterSuggestion {
    let capacity_kw = engine
        .capacity_basis
        .select(sizing.required_capacity_kwp, sizing.installed_capacity_kwp);
    if capacity_kw < report.three_phase_threshold_kwp {
        InverterSuggestion { phase: InverterPhase::SinglePhase, voltage: "220V".to_string(), capacity_kw }
    } else {
        InverterSuggestion { phase: InverterPhase::ThreePhase, voltage: "208V/480V".to_string(), capacity_kw }
    }
}

/// Monthly bill today versus with the system. The bill itself never drops
/// below zero; `net_monthly_balance` keeps the surplus visible as a credit.
pub fn compare_bill(input: &ProjectInput, sizing: &SizingResult) -> BillComparison {
    let current_monthly_bill = input.monthly_consumption_kwh * input.tariff_per_kwh;
    let net_monthly_balance = current_monthly_bill - sizing.annual_energy_savings / 12.0;
    let monthly_bill_with_solar = net_monthly_balance.max(0.0);
    BillComparison {
        current_monthly_bill,
        monthly_bill_with_solar,
        monthly_savings: current_monthly_bill - monthly_bill_with_solar,
        net_monthly_balance,
    }
}
