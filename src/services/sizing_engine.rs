/// ============================================================
///  Photovoltaic Sizing & Financial Engine
///
///  Pipeline (one deterministic pass, no I/O):
///   1. Demand        – daily energy = monthly consumption / 30
///   2. Capacity      – kWp = daily demand / (HSP × efficiency)
///   3. Panels        – whole modules, always rounded up
///   4. Footprint     – panel area + maintenance clearance, roof load
///   5. Investment    – capacity × cost per kWp (pricing model)
///   6. Generation    – kWp × HSP × efficiency × 365
///   7. Energy value  – self-consumed at tariff, surplus at buy-back rate
///   8. Tax benefit   – Law 1715 deduction spread over its horizon
///   9. Payback       – investment / annual savings
///  10. Cash flow     – cumulative position, year 0 … horizon
///  11. Environment   – avoided CO2 and tree equivalents
/// ============================================================

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::project::{CashFlowPoint, EnvironmentalImpact, ProjectInput, SizingResult};

const DAYS_PER_YEAR: f64 = 365.0;

/// Sizes the array and evaluates its economics for one project.
///
/// Fails with `InvalidInput`/`InvalidConfig` on out-of-range values and with
/// `DivisionByZero` when the system would never pay for itself.
pub fn compute(input: &ProjectInput, config: &EngineConfig) -> Result<SizingResult, EngineError> {
    config.validate()?;
    input.validate()?;

    // ── 1-2. Demand and capacity ───────────────────────────────
    let daily_demand_kwh = input.monthly_consumption_kwh / config.days_per_month;
    let required_capacity_kwp = daily_demand_kwh / (input.peak_sun_hours * config.panel_efficiency);

    // ── 3. Panels ──────────────────────────────────────────────
    let panel_count = panel_count(required_capacity_kwp, config.panel_wattage_w)?;
    let installed_capacity_kwp = f64::from(panel_count) * config.panel_wattage_w / 1000.0;
    let capacity_kwp = config.capacity_basis.select(required_capacity_kwp, installed_capacity_kwp);

    // ── 4. Footprint ───────────────────────────────────────────
    let panel_area_m2 = f64::from(panel_count) * config.panel_area_m2;
    let clearance_area_m2 = panel_area_m2 * config.maintenance_clearance;
    let roof_area_m2 = panel_area_m2 + clearance_area_m2;
    let roof_weight_kg = f64::from(panel_count) * config.panel_weight_kg * config.structural_safety_factor;

    // ── 5. Investment ──────────────────────────────────────────
    let cost_per_kwp = config
        .pricing
        .cost_per_kwp(capacity_kwp)
        .map_err(|e| EngineError::InvalidConfig(format!("pricing: {e}")))?;
    let total_investment = capacity_kwp * cost_per_kwp;

    // ── 6-9. Generation, savings, payback ──────────────────────
    let annual_generation_kwh = capacity_kwp * input.peak_sun_hours * config.panel_efficiency * DAYS_PER_YEAR;
    let annual_energy_savings = energy_savings(annual_generation_kwh, input, config);
    let annual_tax_benefit = if input.claims_tax_incentive {
        total_investment * config.tax_deduction_fraction * config.marginal_tax_rate
            / f64::from(config.tax_deduction_years)
    } else {
        0.0
    };
    let annual_total_savings = annual_energy_savings + annual_tax_benefit;

    if annual_total_savings <= 0.0 {
        tracing::debug!(total_investment, "no annual savings, payback undefined");
        return Err(EngineError::DivisionByZero);
    }
    let payback_years = total_investment / annual_total_savings;

    // ── 10-11. Cash flow and environment ───────────────────────
    let cash_flow_series = cash_flow_series(total_investment, annual_energy_savings, annual_tax_benefit, config);
    let co2_avoided_kg_per_year = annual_generation_kwh * config.emission_factor_kg_per_kwh;
    let environmental = EnvironmentalImpact {
        co2_avoided_kg_per_year,
        tree_equivalent: co2_avoided_kg_per_year / config.co2_kg_per_tree,
    };

    tracing::debug!(
        required_capacity_kwp,
        panel_count,
        total_investment,
        annual_total_savings,
        payback_years,
        "sizing complete"
    );

    Ok(SizingResult {
        required_capacity_kwp,
        installed_capacity_kwp,
        panel_count,
        panel_area_m2,
        clearance_area_m2,
        roof_area_m2,
        roof_weight_kg,
        cost_per_kwp,
        total_investment,
        annual_generation_kwh,
        annual_energy_savings,
        annual_tax_benefit,
        annual_total_savings,
        payback_years,
        cash_flow_series,
        environmental,
    })
}

/// Whole modules needed to reach `capacity_kwp`; partial panels are not sold.
///
/// A demand whose panel count does not fit a `u32` is rejected rather than
/// saturated, so the installed capacity always matches the required one.
pub fn panel_count(capacity_kwp: f64, panel_wattage_w: f64) -> Result<u32, EngineError> {
    let panels = (capacity_kwp * 1000.0 / panel_wattage_w).ceil();
    if !panels.is_finite() || panels < 0.0 || panels > f64::from(u32::MAX) {
        return Err(EngineError::invalid_input(
            "monthly_consumption_kwh",
            format!("demand needs {panels} panels, more than a single quote can hold"),
        ));
    }
    Ok(panels as u32)
}

/// Self-consumed energy offsets the tariff 1:1, exported surplus is paid at
/// `excess_energy_buy_rate` of it.
fn energy_savings(annual_generation_kwh: f64, input: &ProjectInput, config: &EngineConfig) -> f64 {
    let ratio = input.self_consumption_ratio;
    annual_generation_kwh * ratio * input.tariff_per_kwh
        + annual_generation_kwh * (1.0 - ratio) * input.tariff_per_kwh * config.excess_energy_buy_rate
}

/// Year 0 holds the investment; each following year adds that year's savings.
/// With zero degradation every step is exactly `energy + tax`.
fn cash_flow_series(
    total_investment: f64,
    annual_energy_savings: f64,
    annual_tax_benefit: f64,
    config: &EngineConfig,
) -> Vec<CashFlowPoint> {
    let horizon = config.cash_flow_horizon_years;
    let mut series = Vec::with_capacity(horizon as usize + 1);
    let mut cumulative = -total_investment;
    series.push(CashFlowPoint { year: 0, cumulative_cash_flow: cumulative, recovered: cumulative >= 0.0 });

    for year in 1..=horizon {
        let retention = (1.0 - config.annual_degradation).powi(year as i32 - 1);
        cumulative += annual_energy_savings * retention + annual_tax_benefit;
        series.push(CashFlowPoint { year, cumulative_cash_flow: cumulative, recovered: cumulative >= 0.0 });
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CapacityBasis;
    use crate::services::pricing::PricingModel;
    use proptest::prelude::*;

    fn bogota() -> ProjectInput {
        ProjectInput {
            monthly_consumption_kwh: 300.0,
            tariff_per_kwh: 950.0,
            self_consumption_ratio: 0.60,
            claims_tax_incentive: true,
            peak_sun_hours: 4.1,
        }
    }

    fn required_basis() -> EngineConfig {
        EngineConfig { capacity_basis: CapacityBasis::Required, ..EngineConfig::default() }
    }

    #[test]
    fn test_bogota_example_on_required_capacity() {
        let r = compute(&bogota(), &required_basis()).unwrap();

        let required = (300.0 / 30.0) / (4.1 * 0.80);
        assert_eq!(r.required_capacity_kwp, required);
        assert!((r.required_capacity_kwp - 3.0488).abs() < 1e-3);
        assert_eq!(r.panel_count, 6);
        assert_eq!(r.cost_per_kwp, 4_600_000.0);
        assert_eq!(r.total_investment, required * 4_600_000.0);

        let generation = required * 4.1 * 0.80 * 365.0;
        assert_eq!(r.annual_generation_kwh, generation);
        let energy = generation * 0.60 * 950.0 + generation * (1.0 - 0.60) * 950.0 * 0.60;
        assert_eq!(r.annual_energy_savings, energy);
        let tax = r.total_investment * 0.50 * 0.35 / 5.0;
        assert_eq!(r.annual_tax_benefit, tax);
        assert_eq!(r.annual_total_savings, energy + tax);
        assert_eq!(r.payback_years, r.total_investment / (energy + tax));
        println!(
            "Bogotá 300 kWh: {:.2} kWp, {} panels, investment {:.0} COP, payback {:.2} years",
            r.required_capacity_kwp, r.panel_count, r.total_investment, r.payback_years
        );
    }

    #[test]
    fn test_installed_capacity_basis_prices_whole_panels() {
        let r = compute(&bogota(), &EngineConfig::default()).unwrap();
        assert_eq!(r.panel_count, 6);
        assert_eq!(r.installed_capacity_kwp, 6.0 * 550.0 / 1000.0);
        assert_eq!(r.total_investment, r.installed_capacity_kwp * 4_600_000.0);
        assert_eq!(r.annual_generation_kwh, r.installed_capacity_kwp * 4.1 * 0.80 * 365.0);
    }

    #[test]
    fn test_footprint_and_weight() {
        let r = compute(&bogota(), &EngineConfig::default()).unwrap();
        assert_eq!(r.panel_area_m2, 6.0 * 2.6);
        assert_eq!(r.clearance_area_m2, 6.0 * 2.6 * 0.15);
        assert_eq!(r.roof_area_m2, r.panel_area_m2 + r.clearance_area_m2);
        assert_eq!(r.roof_weight_kg, 6.0 * 28.0 * 1.20);
    }

    #[test]
    fn test_small_system_uses_top_tier_price() {
        let input = ProjectInput { monthly_consumption_kwh: 150.0, ..bogota() };
        let r = compute(&input, &required_basis()).unwrap();
        assert!(r.required_capacity_kwp < 3.0);
        assert_eq!(r.cost_per_kwp, 6_000_000.0);
    }

    #[test]
    fn test_flat_per_watt_pricing() {
        let config = EngineConfig {
            pricing: PricingModel::PerWatt { cost_per_watt: 4500.0 },
            ..required_basis()
        };
        let r = compute(&bogota(), &config).unwrap();
        assert_eq!(r.cost_per_kwp, 4_500_000.0);
        assert_eq!(r.total_investment, r.required_capacity_kwp * 4_500_000.0);
    }

    #[test]
    fn test_fifteen_year_amortization() {
        let config = EngineConfig { tax_deduction_years: 15, ..EngineConfig::default() };
        let r = compute(&bogota(), &config).unwrap();
        assert_eq!(r.annual_tax_benefit, r.total_investment * 0.50 * 0.35 / 15.0);
    }

    #[test]
    fn test_cash_flow_series_shape() {
        let r = compute(&bogota(), &EngineConfig::default()).unwrap();
        assert_eq!(r.cash_flow_series.len(), 11);
        assert_eq!(r.cash_flow_series[0].year, 0);
        assert_eq!(r.cash_flow_series[0].cumulative_cash_flow, -r.total_investment);
        assert!(!r.cash_flow_series[0].recovered);
        for pair in r.cash_flow_series.windows(2) {
            assert_eq!(pair[1].year, pair[0].year + 1);
            assert_eq!(pair[1].cumulative_cash_flow, pair[0].cumulative_cash_flow + r.annual_total_savings);
        }
        let first_recovered = r.cash_flow_series.iter().find(|p| p.recovered).map(|p| p.year);
        assert_eq!(first_recovered, Some(r.payback_years.ceil() as u32));
    }

    #[test]
    fn test_degradation_slows_recovery() {
        let config = EngineConfig { annual_degradation: 0.005, ..EngineConfig::default() };
        let flat = compute(&bogota(), &EngineConfig::default()).unwrap();
        let degraded = compute(&bogota(), &config).unwrap();
        assert_eq!(degraded.cash_flow_series[1], flat.cash_flow_series[1]);
        assert!(degraded.cash_flow_series[10].cumulative_cash_flow < flat.cash_flow_series[10].cumulative_cash_flow);
        // Headline figures are first-year values and do not degrade.
        assert_eq!(degraded.payback_years, flat.payback_years);
    }

    #[test]
    fn test_environmental_metrics() {
        let r = compute(&bogota(), &EngineConfig::default()).unwrap();
        assert_eq!(r.environmental.co2_avoided_kg_per_year, r.annual_generation_kwh * 0.126);
        assert_eq!(r.environmental.tree_equivalent, r.environmental.co2_avoided_kg_per_year / 20.0);
    }

    #[test]
    fn test_zero_savings_is_division_by_zero() {
        let input = ProjectInput {
            tariff_per_kwh: 0.0,
            self_consumption_ratio: 0.0,
            claims_tax_incentive: false,
            ..bogota()
        };
        assert_eq!(compute(&input, &EngineConfig::default()), Err(EngineError::DivisionByZero));

        let no_demand = ProjectInput { monthly_consumption_kwh: 0.0, ..bogota() };
        assert_eq!(compute(&no_demand, &EngineConfig::default()), Err(EngineError::DivisionByZero));
    }

    #[test]
    fn test_tax_benefit_alone_keeps_payback_defined() {
        let input = ProjectInput { tariff_per_kwh: 0.0, self_consumption_ratio: 0.0, ..bogota() };
        let r = compute(&input, &EngineConfig::default()).unwrap();
        assert_eq!(r.annual_energy_savings, 0.0);
        assert!((r.payback_years - 5.0 / (0.50 * 0.35)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_input_and_config() {
        let input = ProjectInput { peak_sun_hours: 0.0, ..bogota() };
        assert!(matches!(
            compute(&input, &EngineConfig::default()),
            Err(EngineError::InvalidInput { field: "peak_sun_hours", .. })
        ));

        let config = EngineConfig { panel_wattage_w: 0.0, ..EngineConfig::default() };
        assert!(matches!(compute(&bogota(), &config), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_demand_is_rejected_not_saturated() {
        let input = ProjectInput { monthly_consumption_kwh: 1e15, ..bogota() };
        assert!(matches!(
            compute(&input, &EngineConfig::default()),
            Err(EngineError::InvalidInput { field: "monthly_consumption_kwh", .. })
        ));

        let largest_kwp = f64::from(u32::MAX) * 0.5;
        assert_eq!(panel_count(largest_kwp, 500.0), Ok(u32::MAX));
        assert!(panel_count(largest_kwp + 1.0, 500.0).is_err());
    }

    fn project() -> impl Strategy<Value = ProjectInput> {
        (1.0f64..20_000.0, 100.0f64..2_000.0, 0.0f64..=1.0, any::<bool>(), 3.0f64..6.5).prop_map(
            |(monthly_consumption_kwh, tariff_per_kwh, self_consumption_ratio, claims_tax_incentive, peak_sun_hours)| {
                ProjectInput {
                    monthly_consumption_kwh,
                    tariff_per_kwh,
                    self_consumption_ratio,
                    claims_tax_incentive,
                    peak_sun_hours,
                }
            },
        )
    }

    proptest! {
        #[test]
        fn prop_panel_count_is_ceiling(input in project()) {
            let config = EngineConfig::default();
            let r = compute(&input, &config).unwrap();
            let expected = (r.required_capacity_kwp * 1000.0 / 550.0).ceil();
            prop_assert_eq!(f64::from(r.panel_count), expected);
            prop_assert!(r.panel_count >= 1);
        }

        #[test]
        fn prop_cash_flow_steps_by_total_savings(input in project()) {
            let r = compute(&input, &EngineConfig::default()).unwrap();
            prop_assert_eq!(r.cash_flow_series.len(), 11);
            prop_assert_eq!(r.cash_flow_series[0].cumulative_cash_flow, -r.total_investment);
            for pair in r.cash_flow_series.windows(2) {
                prop_assert_eq!(pair[1].cumulative_cash_flow, pair[0].cumulative_cash_flow + r.annual_total_savings);
                prop_assert!(pair[1].cumulative_cash_flow >= pair[0].cumulative_cash_flow);
            }
        }

        #[test]
        fn prop_tax_incentive_shortens_payback(input in project()) {
            let config = EngineConfig::default();
            let with = compute(&ProjectInput { claims_tax_incentive: true, ..input.clone() }, &config).unwrap();
            let without = compute(&ProjectInput { claims_tax_incentive: false, ..input }, &config).unwrap();
            prop_assert_eq!(without.annual_tax_benefit, 0.0);
            prop_assert!(with.annual_tax_benefit > 0.0);
            prop_assert!(without.payback_years > with.payback_years);
        }

        #[test]
        fn prop_full_self_consumption_maximizes_savings(input in project(), ratio in 0.0f64..0.99) {
            let config = EngineConfig::default();
            let partial = compute(&ProjectInput { self_consumption_ratio: ratio, ..input.clone() }, &config).unwrap();
            let full = compute(&ProjectInput { self_consumption_ratio: 1.0, ..input }, &config).unwrap();
            prop_assert_eq!(partial.annual_generation_kwh, full.annual_generation_kwh);
            prop_assert!(full.annual_energy_savings >= partial.annual_energy_savings);
        }

        #[test]
        fn prop_recomputation_is_bit_identical(input in project()) {
            let config = EngineConfig::default();
            prop_assert_eq!(compute(&input, &config), compute(&input, &config));
        }
    }
}
