/// Installed-cost models for a photovoltaic system.
///
/// Two formulations are supported:
///  - `Tiered`  – cost per kWp chosen from contiguous capacity brackets,
///                smaller systems pay more per kWp (fixed costs dominate)
///  - `PerWatt` – a flat cost per installed watt
///
/// Tier bounds are half-open `[lower, upper)`; the last tier has no upper
/// bound so the table covers `[0, ∞)` without gaps or overlaps.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriceTier {
    /// Inclusive lower bound (kWp)
    pub lower_kwp: f64,
    /// Exclusive upper bound (kWp); `None` only for the last tier
    #[serde(default)]
    pub upper_kwp: Option<f64>,
    /// Installed cost per kWp (COP)
    pub cost_per_kwp: f64,
}

impl PriceTier {
    pub fn new(lower_kwp: f64, upper_kwp: Option<f64>, cost_per_kwp: f64) -> Self {
        Self { lower_kwp, upper_kwp, cost_per_kwp }
    }

    pub fn contains(&self, capacity_kwp: f64) -> bool {
        capacity_kwp >= self.lower_kwp && self.upper_kwp.is_none_or(|upper| capacity_kwp < upper)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum PricingModel {
    Tiered { tiers: Vec<PriceTier> },
    PerWatt { cost_per_watt: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("pricing table has no tiers")]
    Empty,
    #[error("first tier must start at 0 kWp, found {0}")]
    FirstTierNotAtZero(f64),
    #[error("tier {index} starts at {lower} kWp but the previous tier ends at {previous_upper} kWp")]
    NotContiguous { index: usize, lower: f64, previous_upper: f64 },
    #[error("tier {index} is empty: [{lower}, {upper})")]
    EmptyTier { index: usize, lower: f64, upper: f64 },
    #[error("tier {0} is unbounded but is not the last tier")]
    UnboundedBeforeLast(usize),
    #[error("last tier must be unbounded")]
    LastTierBounded,
    #[error("tier {index} costs more per kWp than the tier before it")]
    CostIncreases { index: usize },
    #[error("cost must be positive and finite, found {0}")]
    InvalidCost(f64),
    #[error("capacity {0} kWp cannot be priced")]
    InvalidCapacity(f64),
}

/// Colombian market brackets (COP per kWp).
impl Default for PricingModel {
    fn default() -> Self {
        PricingModel::Tiered {
            tiers: vec![
                PriceTier::new(0.0, Some(3.0), 6_000_000.0),
                PriceTier::new(3.0, Some(15.0), 4_600_000.0),
                PriceTier::new(15.0, Some(100.0), 3_750_000.0),
                PriceTier::new(100.0, None, 3_200_000.0),
            ],
        }
    }
}

impl PricingModel {
    /// Checks that the tiers are contiguous, gapless, cover `[0, ∞)` and
    /// never get more expensive per kWp as capacity grows.
    pub fn validate(&self) -> Result<(), PricingError> {
        match self {
            PricingModel::PerWatt { cost_per_watt } => check_cost(*cost_per_watt),
            PricingModel::Tiered { tiers } => {
                let first = tiers.first().ok_or(PricingError::Empty)?;
                if first.lower_kwp != 0.0 {
                    return Err(PricingError::FirstTierNotAtZero(first.lower_kwp));
                }

                let last_index = tiers.len() - 1;
                for (index, tier) in tiers.iter().enumerate() {
                    check_cost(tier.cost_per_kwp)?;

                    match tier.upper_kwp {
                        Some(upper) => {
                            if index == last_index {
                                return Err(PricingError::LastTierBounded);
                            }
                            if !upper.is_finite() || upper <= tier.lower_kwp {
                                return Err(PricingError::EmptyTier { index, lower: tier.lower_kwp, upper });
                            }
                        }
                        None if index != last_index => return Err(PricingError::UnboundedBeforeLast(index)),
                        None => {}
                    }

                    if index > 0 {
                        let previous = &tiers[index - 1];
                        // Bounded by the check above on the previous iteration.
                        let previous_upper = previous.upper_kwp.unwrap_or(f64::INFINITY);
                        if tier.lower_kwp != previous_upper {
                            return Err(PricingError::NotContiguous { index, lower: tier.lower_kwp, previous_upper });
                        }
                        if tier.cost_per_kwp > previous.cost_per_kwp {
                            return Err(PricingError::CostIncreases { index });
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Installed cost per kWp for a system of `capacity_kwp`.
    ///
    /// Expects a validated model; tier lookup is a binary search on the
    /// lower bounds.
    pub fn cost_per_kwp(&self, capacity_kwp: f64) -> Result<f64, PricingError> {
        if !capacity_kwp.is_finite() || capacity_kwp < 0.0 {
            return Err(PricingError::InvalidCapacity(capacity_kwp));
        }
        match self {
            PricingModel::PerWatt { cost_per_watt } => Ok(cost_per_watt * 1000.0),
            PricingModel::Tiered { tiers } => {
                let above = tiers.partition_point(|tier| tier.lower_kwp <= capacity_kwp);
                above
                    .checked_sub(1)
                    .and_then(|index| tiers.get(index))
                    .filter(|tier| tier.contains(capacity_kwp))
                    .map(|tier| tier.cost_per_kwp)
                    .ok_or(PricingError::InvalidCapacity(capacity_kwp))
            }
        }
    }
}

fn check_cost(cost: f64) -> Result<(), PricingError> {
    if cost.is_finite() && cost > 0.0 {
        Ok(())
    } else {
        Err(PricingError::InvalidCost(cost))
    }
}
