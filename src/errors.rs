use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::DebtId;

#[derive(Error, Debug)]
pub enum PayoffError {
    #[error("invalid debt {id}: {reason}")]
    InvalidDebt {
        id: DebtId,
        reason: String,
    },

    #[error("invalid extra payment: {amount}")]
    InvalidExtraPayment {
        amount: Money,
    },

    #[error("invalid loan term: {months} months")]
    InvalidTerm {
        months: u32,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("stress level must be between 1 and 10, got {level}")]
    InvalidStressLevel {
        level: u8,
    },

    #[error("no debts supplied")]
    EmptyDebtSet,

    #[error("debt not found: {id}")]
    DebtNotFound {
        id: DebtId,
    },

    #[error("payoff date {months} months out is not representable")]
    DateOutOfRange {
        months: u32,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid assessment: {reason}")]
    InvalidAssessment {
        reason: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PayoffError>;
