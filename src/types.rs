use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{PayoffError, Result};

/// opaque identifier of a debt, stable for the lifetime of a simulation
pub type DebtId = String;

/// repayment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtMethod {
    /// smallest balance first
    Snowball,
    /// highest interest rate first
    Avalanche,
    /// snowball on a few small debts, then avalanche
    Hybrid,
    /// single fixed-rate replacement loan
    Consolidation,
}

impl DebtMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebtMethod::Snowball => "snowball",
            DebtMethod::Avalanche => "avalanche",
            DebtMethod::Hybrid => "hybrid",
            DebtMethod::Consolidation => "consolidation",
        }
    }
}

impl fmt::Display for DebtMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebtMethod {
    type Err = PayoffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snowball" => Ok(DebtMethod::Snowball),
            "avalanche" => Ok(DebtMethod::Avalanche),
            "hybrid" => Ok(DebtMethod::Hybrid),
            "consolidation" => Ok(DebtMethod::Consolidation),
            other => Err(PayoffError::InvalidConfiguration {
                message: format!("unknown debt method '{other}'"),
            }),
        }
    }
}

/// kind of liability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    CreditCard,
    StudentLoan,
    #[default]
    Personal,
    Mortgage,
    AutoLoan,
}

impl DebtType {
    /// map an intake form label; unknown labels count as personal debt
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Credit Card" | "credit_card" => DebtType::CreditCard,
            "Student Loan" | "student_loan" => DebtType::StudentLoan,
            "Auto Loan" | "auto_loan" => DebtType::AutoLoan,
            "Mortgage" | "mortgage" => DebtType::Mortgage,
            _ => DebtType::Personal,
        }
    }
}

/// how a recorded payment was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Regular,
    Extra,
    Minimum,
}

/// self-reported financial stress on a 1-10 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StressLevel(u8);

impl StressLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(level: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(StressLevel(level))
        } else {
            Err(PayoffError::InvalidStressLevel { level })
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for StressLevel {
    type Error = PayoffError;

    fn try_from(level: u8) -> Result<Self> {
        StressLevel::new(level)
    }
}

impl From<StressLevel> for u8 {
    fn from(level: StressLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// terminal state of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationOutcome {
    /// every balance reached zero
    Completed,
    /// the month bound was hit with balance remaining
    NonConvergent,
}
