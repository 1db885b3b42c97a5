use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::EngineError;
use crate::services::pricing::PricingModel;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

fn default_port() -> u16 { 8080 }
fn default_static_dir() -> String { "static".to_string() }

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port(), static_dir: default_static_dir() }
    }
}

/// Which capacity figure drives pricing and generation.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CapacityBasis {
    /// Theoretical capacity straight from the demand formula
    Required,
    /// Capacity of the whole panels actually installed
    #[default]
    Installed,
}

impl CapacityBasis {
    pub fn select(self, required_kwp: f64, installed_kwp: f64) -> f64 {
        match self {
            CapacityBasis::Required => required_kwp,
            CapacityBasis::Installed => installed_kwp,
        }
    }
}

/// Engineering and economic constants of the sizing engine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, ToSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// System performance factor (losses from inverter, wiring, soiling, heat)
    pub panel_efficiency: f64,
    pub panel_wattage_w: f64,
    /// Module footprint including structure (m²)
    pub panel_area_m2: f64,
    /// Module plus racking weight (kg)
    pub panel_weight_kg: f64,
    /// Extra roof area for maintenance walkways, as a fraction of panel area
    pub maintenance_clearance: f64,
    /// Multiplier applied to the roof load
    pub structural_safety_factor: f64,
    pub capacity_basis: CapacityBasis,
    /// Fraction of the tariff paid for energy exported to the grid
    pub excess_energy_buy_rate: f64,
    /// Fraction of the investment deductible from taxable income (Law 1715)
    pub tax_deduction_fraction: f64,
    pub marginal_tax_rate: f64,
    /// Years over which the deduction is spread
    pub tax_deduction_years: u32,
    pub cash_flow_horizon_years: u32,
    /// Yearly loss of energy savings applied in the cash-flow series
    pub annual_degradation: f64,
    /// Grid CO2 intensity (kg/kWh)
    pub emission_factor_kg_per_kwh: f64,
    /// CO2 absorbed by one tree in a year (kg)
    pub co2_kg_per_tree: f64,
    pub days_per_month: f64,
    pub pricing: PricingModel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            panel_efficiency: 0.80,
            panel_wattage_w: 550.0,
            panel_area_m2: 2.6,
            panel_weight_kg: 28.0,
            maintenance_clearance: 0.15,
            structural_safety_factor: 1.20,
            capacity_basis: CapacityBasis::Installed,
            excess_energy_buy_rate: 0.60,
            tax_deduction_fraction: 0.50,
            marginal_tax_rate: 0.35,
            tax_deduction_years: 5,
            cash_flow_horizon_years: 10,
            annual_degradation: 0.0,
            emission_factor_kg_per_kwh: 0.126,
            co2_kg_per_tree: 20.0,
            days_per_month: 30.0,
            pricing: PricingModel::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;

        let checks = [
            ("panel_efficiency", positive(self.panel_efficiency) && self.panel_efficiency <= 1.0),
            ("panel_wattage_w", positive(self.panel_wattage_w)),
            ("panel_area_m2", non_negative(self.panel_area_m2)),
            ("panel_weight_kg", non_negative(self.panel_weight_kg)),
            ("maintenance_clearance", non_negative(self.maintenance_clearance)),
            ("structural_safety_factor", positive(self.structural_safety_factor)),
            ("excess_energy_buy_rate", in_unit(self.excess_energy_buy_rate)),
            ("tax_deduction_fraction", in_unit(self.tax_deduction_fraction)),
            ("marginal_tax_rate", in_unit(self.marginal_tax_rate)),
            ("tax_deduction_years", self.tax_deduction_years > 0),
            ("cash_flow_horizon_years", self.cash_flow_horizon_years > 0),
            ("annual_degradation", in_unit(self.annual_degradation) && self.annual_degradation < 1.0),
            ("emission_factor_kg_per_kwh", non_negative(self.emission_factor_kg_per_kwh)),
            ("co2_kg_per_tree", positive(self.co2_kg_per_tree)),
            ("days_per_month", positive(self.days_per_month)),
        ];
        if let Some((name, _)) = checks.iter().find(|(_, ok)| !ok) {
            return Err(EngineError::InvalidConfig(format!("`{name}` is out of range")));
        }

        self.pricing
            .validate()
            .map_err(|e| EngineError::InvalidConfig(format!("pricing: {e}")))
    }
}

fn default_three_phase_threshold_kwp() -> f64 { 8.0 }

/// Presentation-side knobs of the quote report.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReportConfig {
    /// Systems at or above this capacity get a three-phase inverter
    #[serde(default = "default_three_phase_threshold_kwp")]
    pub three_phase_threshold_kwp: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { three_phase_threshold_kwp: default_three_phase_threshold_kwp() }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: String, #[source] source: serde_json::Error },
    #[error(transparent)]
    Invalid(#[from] EngineError),
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: display.clone(), source })?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: display, source })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the built-in defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(&path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.as_ref().display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.engine.validate()?;
        let threshold = self.report.three_phase_threshold_kwp;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "`three_phase_threshold_kwp` is out of range".to_string(),
            ));
        }
        Ok(())
    }
}
