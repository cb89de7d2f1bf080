use log::debug;

use crate::debt::DebtInput;
use crate::decimal::{Money, Rate};
use crate::errors::{PayoffError, Result};
use crate::events::{Event, EventStore};
use crate::payments::{annuity_payment, DebtCalculation, MonthlyPayment, StepAllocation};
use crate::strategy::simulator::finish;
use crate::types::{DebtMethod, SimulationOutcome};

pub const CONSOLIDATED_DEBT_ID: &str = "consolidated";
pub const CONSOLIDATED_DEBT_NAME: &str = "Consolidated Loan";

/// longest accepted term, the same 50 years the strategy simulations are bounded by
pub const MAX_TERM_MONTHS: u32 = 600;

/// replaces every debt with one fixed-rate, fixed-term amortizing loan
#[derive(Debug, Clone, Copy)]
pub struct ConsolidationCalculator {
    annual_rate: Rate,
    term_months: u32,
}

impl ConsolidationCalculator {
    pub fn new(annual_rate: Rate, term_months: u32) -> Result<Self> {
        if term_months == 0 || term_months > MAX_TERM_MONTHS {
            return Err(PayoffError::InvalidTerm { months: term_months });
        }
        if annual_rate.is_negative() {
            return Err(PayoffError::InvalidInterestRate { rate: annual_rate });
        }
        Ok(Self {
            annual_rate,
            term_months,
        })
    }

    /// level payment on the consolidated balance
    ///
    /// Fails with `InvalidTerm` when the rate compounded over the term is
    /// too large to represent.
    pub fn monthly_payment(&self, principal: Money) -> Result<Money> {
        annuity_payment(principal, self.annual_rate, self.term_months).ok_or(PayoffError::InvalidTerm {
            months: self.term_months,
        })
    }

    pub fn calculate(&self, debts: &[DebtInput], events: &mut EventStore) -> Result<DebtCalculation> {
        let principal = debts
            .iter()
            .try_fold(Money::ZERO, |acc, d| acc.checked_add(d.balance.max(Money::ZERO)))
            .ok_or_else(|| PayoffError::InvalidConfiguration {
                message: "combined balance is too large to consolidate".to_string(),
            })?;
        let payment = self.monthly_payment(principal)?;
        debug!(
            "consolidating {} at {} over {} months, payment {}",
            principal, self.annual_rate, self.term_months, payment
        );
        events.emit(Event::SimulationStarted {
            method: DebtMethod::Consolidation,
            debt_count: debts.len(),
            total_balance: principal,
            extra_payment: Money::ZERO,
        });

        let mut monthly_breakdown = Vec::new();
        let mut balance = principal;
        let mut interest_paid = Money::ZERO;
        let mut months = 0;

        while months < self.term_months && balance.is_positive() {
            months += 1;
            // the balance only shrinks, so a month that fits once keeps fitting
            let step = StepAllocation::with_payment(balance, self.annual_rate, payment)
                .and_then(StepAllocation::settle)
                .ok_or(PayoffError::InvalidTerm {
                    months: self.term_months,
                })?;
            balance = step.ending_balance;
            interest_paid += step.interest;
            monthly_breakdown.push(MonthlyPayment::record(
                months,
                CONSOLIDATED_DEBT_ID,
                CONSOLIDATED_DEBT_NAME,
                &step,
            ));
        }

        let total_debt = balance.to_cents();
        let calculation = DebtCalculation {
            method: DebtMethod::Consolidation,
            total_debt,
            monthly_payment: payment.to_cents(),
            payoff_time: months,
            total_interest: interest_paid.to_cents(),
            monthly_breakdown,
            // sub-cent residue from the level payment is not a real balance
            outcome: if total_debt.is_zero() {
                SimulationOutcome::Completed
            } else {
                SimulationOutcome::NonConvergent
            },
        };
        finish(&calculation, events);
        Ok(calculation)
    }
}
