use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{PayoffError, Result};

/// planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// safety bound on simulated months
    pub max_months: u32,
    pub extra_payment_policy: ExtraPaymentPolicy,
    pub hybrid: HybridConfig,
    pub recommendation: RecommendationConfig,
    pub storage: StorageConfig,
}

/// what happens to extra payment the focus debt cannot absorb in a month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraPaymentPolicy {
    /// only the focus debt receives extra; any leftover is dropped for that month
    FocusOnly,
    /// leftover extra rolls to the next debt in priority order the same month
    Waterfall,
}

/// hybrid method settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    /// phase one debts must have a balance strictly below this
    pub small_debt_ceiling: Money,
    /// how many of the smallest debts are considered for phase one
    pub phase_one_candidates: usize,
    /// add phase one minimums to the phase two extra payment
    pub roll_phase_one_minimums: bool,
}

/// thresholds for the recommendation heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub high_stress: u8,
    pub moderate_stress_min: u8,
    pub moderate_stress_max: u8,
    /// dashboard heuristic needs at least this many debts for snowball
    pub snowball_min_debts: usize,
    /// APR spread in percentage points above which avalanche wins
    pub rate_spread_threshold: Decimal,
    /// balance below which a debt counts as small for the dashboard profile
    pub small_debt_threshold: Money,
    /// assessment heuristic: at or below this stress, avalanche
    pub assessment_low_stress: u8,
    /// assessment heuristic small-debt threshold
    pub assessment_small_debt: Money,
    /// comparison heuristic: avalanche savings that justify it
    pub comparison_interest_savings: Money,
    /// comparison heuristic: months faster that justify avalanche
    pub comparison_months_faster: u32,
    pub comparison_hybrid_min_debts: usize,
    pub comparison_hybrid_small_debt: Money,
    pub comparison_snowball_small_debt: Money,
    pub comparison_snowball_min_small: usize,
}

/// where debt records live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// ephemeral in-process store (demo mode)
    Memory,
    /// JSON document on disk
    JsonFile { path: PathBuf },
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            small_debt_ceiling: Money::from_major(5_000),
            phase_one_candidates: 2,
            roll_phase_one_minimums: false,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            high_stress: 7,
            moderate_stress_min: 4,
            moderate_stress_max: 6,
            snowball_min_debts: 3,
            rate_spread_threshold: dec!(5),
            small_debt_threshold: Money::from_major(2_000),
            assessment_low_stress: 4,
            assessment_small_debt: Money::from_major(2_000),
            comparison_interest_savings: Money::from_major(1_000),
            comparison_months_faster: 6,
            comparison_hybrid_min_debts: 4,
            comparison_hybrid_small_debt: Money::from_major(2_000),
            comparison_snowball_small_debt: Money::from_major(3_000),
            comparison_snowball_min_small: 2,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory
    }
}

impl PlannerConfig {
    /// reference behaviour: 600 month bound, focus-only extra, no minimum roll-over
    pub fn reference() -> Self {
        Self {
            max_months: 600,
            extra_payment_policy: ExtraPaymentPolicy::FocusOnly,
            hybrid: HybridConfig::default(),
            recommendation: RecommendationConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// leftover extra cascades down the priority order within a month
    pub fn waterfall() -> Self {
        Self {
            extra_payment_policy: ExtraPaymentPolicy::Waterfall,
            ..Self::reference()
        }
    }

    /// parse and validate from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// load and validate from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_months == 0 {
            return Err(PayoffError::InvalidConfiguration {
                message: "max_months must be positive".to_string(),
            });
        }
        if self.hybrid.small_debt_ceiling.is_negative() {
            return Err(PayoffError::InvalidConfiguration {
                message: "hybrid small_debt_ceiling must not be negative".to_string(),
            });
        }
        let rec = &self.recommendation;
        if rec.moderate_stress_min > rec.moderate_stress_max {
            return Err(PayoffError::InvalidConfiguration {
                message: format!(
                    "moderate stress range {}..={} is empty",
                    rec.moderate_stress_min, rec.moderate_stress_max
                ),
            });
        }
        Ok(())
    }
}
