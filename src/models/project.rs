use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::EngineError;

/// Validated numeric inputs of a sizing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectInput {
    /// Average monthly consumption (kWh)
    pub monthly_consumption_kwh: f64,
    /// Energy tariff (COP/kWh)
    pub tariff_per_kwh: f64,
    /// Fraction of generation used on-site [0..1]
    pub self_consumption_ratio: f64,
    /// Income-tax filer claiming the Law 1715 deduction
    pub claims_tax_incentive: bool,
    /// Location peak sun hours (h/day)
    pub peak_sun_hours: f64,
}

impl ProjectInput {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.peak_sun_hours.is_finite() || self.peak_sun_hours <= 0.0 {
            return Err(EngineError::invalid_input("peak_sun_hours", "must be greater than zero"));
        }
        if !self.monthly_consumption_kwh.is_finite() || self.monthly_consumption_kwh < 0.0 {
            return Err(EngineError::invalid_input("monthly_consumption_kwh", "must not be negative"));
        }
        if !self.tariff_per_kwh.is_finite() || self.tariff_per_kwh < 0.0 {
            return Err(EngineError::invalid_input("tariff_per_kwh", "must not be negative"));
        }
        if !self.self_consumption_ratio.is_finite() || !(0.0..=1.0).contains(&self.self_consumption_ratio) {
            return Err(EngineError::invalid_input("self_consumption_ratio", "must be between 0 and 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct CashFlowPoint {
    pub year: u32,
    /// Cumulative cash position at the end of the year (COP)
    pub cumulative_cash_flow: f64,
    /// Investment fully recovered by this year
    pub recovered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct EnvironmentalImpact {
    pub co2_avoided_kg_per_year: f64,
    pub tree_equivalent: f64,
}

/// Everything derived from one `ProjectInput`. Recomputed on every request,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SizingResult {
    // ── Technical ────────────────────────────────────────────────────────────
    pub required_capacity_kwp: f64,
    /// Nameplate capacity of the whole panels
    pub installed_capacity_kwp: f64,
    pub panel_count: u32,
    pub panel_area_m2: f64,
    /// Walkway and maintenance space around the array
    pub clearance_area_m2: f64,
    pub roof_area_m2: f64,
    /// Roof load including the structural safety factor
    pub roof_weight_kg: f64,

    // ── Financial (COP) ──────────────────────────────────────────────────────
    pub cost_per_kwp: f64,
    pub total_investment: f64,
    pub annual_generation_kwh: f64,
    pub annual_energy_savings: f64,
    pub annual_tax_benefit: f64,
    pub annual_total_savings: f64,
    pub payback_years: f64,
    pub cash_flow_series: Vec<CashFlowPoint>,

    pub environmental: EnvironmentalImpact,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProjectInput {
        ProjectInput {
            monthly_consumption_kwh: 300.0,
            tariff_per_kwh: 950.0,
            self_consumption_ratio: 0.6,
            claims_tax_incentive: true,
            peak_sun_hours: 4.1,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input().validate().is_ok());
        assert!(ProjectInput { monthly_consumption_kwh: 0.0, tariff_per_kwh: 0.0, ..input() }.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields() {
        let cases = [
            (ProjectInput { peak_sun_hours: 0.0, ..input() }, "peak_sun_hours"),
            (ProjectInput { peak_sun_hours: f64::NAN, ..input() }, "peak_sun_hours"),
            (ProjectInput { monthly_consumption_kwh: -1.0, ..input() }, "monthly_consumption_kwh"),
            (ProjectInput { tariff_per_kwh: f64::INFINITY, ..input() }, "tariff_per_kwh"),
            (ProjectInput { self_consumption_ratio: 1.01, ..input() }, "self_consumption_ratio"),
            (ProjectInput { self_consumption_ratio: -0.1, ..input() }, "self_consumption_ratio"),
        ];
        for (case, expected) in cases {
            match case.validate() {
                Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidInput({expected}), got {other:?}"),
            }
        }
    }
}
