use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::{DebtId, DebtMethod, SimulationOutcome};

use super::MonthlyStep;

/// one debt's line in one month of a payoff schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPayment {
    /// 1-based
    pub month: u32,
    pub debt_id: DebtId,
    pub debt_name: String,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub remaining_balance: Money,
}

impl MonthlyPayment {
    /// record a settled step, rounding every amount to cents
    pub fn record(month: u32, debt_id: &str, debt_name: &str, step: &MonthlyStep) -> Self {
        Self {
            month,
            debt_id: debt_id.to_string(),
            debt_name: debt_name.to_string(),
            payment: step.payment.to_cents(),
            principal: step.principal.to_cents(),
            interest: step.interest.to_cents(),
            remaining_balance: step.ending_balance.to_cents(),
        }
    }
}

/// result of a payoff simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtCalculation {
    pub method: DebtMethod,
    /// balance left when the simulation stopped
    pub total_debt: Money,
    /// minimums plus extra at the start
    pub monthly_payment: Money,
    /// months simulated
    pub payoff_time: u32,
    pub total_interest: Money,
    pub monthly_breakdown: Vec<MonthlyPayment>,
    pub outcome: SimulationOutcome,
}

impl DebtCalculation {
    /// result for a debt set with nothing to pay
    pub fn empty(method: DebtMethod, monthly_payment: Money) -> Self {
        Self {
            method,
            total_debt: Money::ZERO,
            monthly_payment,
            payoff_time: 0,
            total_interest: Money::ZERO,
            monthly_breakdown: Vec::new(),
            outcome: SimulationOutcome::Completed,
        }
    }

    pub fn is_converged(&self) -> bool {
        self.outcome == SimulationOutcome::Completed
    }

    /// schedule lines for a given month
    pub fn month(&self, month: u32) -> impl Iterator<Item = &MonthlyPayment> {
        self.monthly_breakdown.iter().filter(move |p| p.month == month)
    }

    /// schedule lines for a given debt, chronological
    pub fn payments_for<'a>(&'a self, debt_id: &'a str) -> impl Iterator<Item = &'a MonthlyPayment> {
        self.monthly_breakdown.iter().filter(move |p| p.debt_id == debt_id)
    }

    /// month in which a debt's balance reached zero
    pub fn payoff_month(&self, debt_id: &str) -> Option<u32> {
        self.payments_for(debt_id)
            .find(|p| p.remaining_balance.is_zero())
            .map(|p| p.month)
    }

    /// sum of all recorded payments
    pub fn total_paid(&self) -> Money {
        self.monthly_breakdown.iter().map(|p| p.payment).sum()
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
