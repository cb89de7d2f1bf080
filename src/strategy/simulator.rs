use log::{debug, trace, warn};

use crate::config::{ExtraPaymentPolicy, PlannerConfig};
use crate::debt::DebtInput;
use crate::decimal::{Money, Rate};
use crate::events::{Event, EventStore};
use crate::payments::{DebtCalculation, MonthlyPayment, MonthlyStep, StepAllocation};
use crate::types::{DebtId, DebtMethod, SimulationOutcome};

use super::ordering::{OrderingPolicy, Ranked};

/// working copy of a debt owned by one simulation run
#[derive(Debug, Clone)]
pub struct WorkingDebt {
    pub id: DebtId,
    pub name: String,
    pub balance: Money,
    pub interest_rate: Rate,
    pub minimum_payment: Money,
}

impl From<&DebtInput> for WorkingDebt {
    fn from(debt: &DebtInput) -> Self {
        Self {
            id: debt.id.clone(),
            name: debt.name.clone(),
            balance: debt.balance,
            interest_rate: debt.interest_rate,
            minimum_payment: debt.minimum_payment,
        }
    }
}

impl Ranked for WorkingDebt {
    fn balance(&self) -> Money {
        self.balance
    }

    fn rate(&self) -> Rate {
        self.interest_rate
    }
}

/// raw output of the month loop, before totals are rounded
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub breakdown: Vec<MonthlyPayment>,
    pub months: u32,
    pub interest: Money,
    pub remaining_balance: Money,
    pub outcome: SimulationOutcome,
}

/// runs a full payoff schedule for one ordering policy
pub struct StrategySimulator<'a> {
    policy: OrderingPolicy,
    method: DebtMethod,
    config: &'a PlannerConfig,
}

impl<'a> StrategySimulator<'a> {
    pub fn new(policy: OrderingPolicy, config: &'a PlannerConfig) -> Self {
        Self {
            policy,
            method: policy.method(),
            config,
        }
    }

    /// report results and events under a different method label
    pub fn labelled(mut self, method: DebtMethod) -> Self {
        self.method = method;
        self
    }

    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    /// simulate to completion (or the month bound) and summarise
    pub fn run(&self, debts: &[DebtInput], extra_payment: Money, events: &mut EventStore) -> DebtCalculation {
        let total_balance = debts
            .iter()
            .fold(Money::ZERO, |acc, d| acc.saturating_add(d.balance.max(Money::ZERO)));
        debug!(
            "{} simulation: {} debts, balance {}, extra {}",
            self.method,
            debts.len(),
            total_balance,
            extra_payment
        );
        events.emit(Event::SimulationStarted {
            method: self.method,
            debt_count: debts.len(),
            total_balance,
            extra_payment,
        });

        let run = self.simulate_months(debts, extra_payment, events);
        let monthly_payment = starting_payment(debts, extra_payment);
        let calculation = DebtCalculation {
            method: self.method,
            total_debt: run.remaining_balance.to_cents(),
            monthly_payment,
            payoff_time: run.months,
            total_interest: run.interest.to_cents(),
            monthly_breakdown: run.breakdown,
            outcome: run.outcome,
        };
        finish(&calculation, events);
        calculation
    }

    /// the month loop; never touches the caller's debts
    pub fn simulate_months(
        &self,
        debts: &[DebtInput],
        extra_payment: Money,
        events: &mut EventStore,
    ) -> SimulationRun {
        let mut active: Vec<WorkingDebt> = debts
            .iter()
            .filter(|d| d.balance.is_positive())
            .map(WorkingDebt::from)
            .collect();
        self.policy.sort(&mut active);

        let mut breakdown = Vec::new();
        let mut interest_paid = Money::ZERO;
        let mut month = 0;
        let mut focus: Option<DebtId> = None;
        let mut overflowed = false;

        while !active.is_empty() {
            month += 1;

            if focus.as_deref() != Some(active[0].id.as_str()) {
                trace!("{} month {}: focus on {}", self.method, month, active[0].id);
                events.emit(Event::FocusDebtChanged {
                    method: self.method,
                    month,
                    debt_id: active[0].id.clone(),
                });
                focus = Some(active[0].id.clone());
            }

            let settled = self.settle_month(&active, extra_payment).and_then(|steps| {
                let total = steps
                    .iter()
                    .try_fold(interest_paid, |acc, step| acc.checked_add(step.interest))?;
                Some((steps, total))
            });
            let Some((steps, total)) = settled else {
                // nothing from this month is committed
                warn!(
                    "{} month {}: balance outgrew the representable range, stopping",
                    self.method, month
                );
                month -= 1;
                overflowed = true;
                break;
            };
            interest_paid = total;

            for (debt, step) in active.iter_mut().zip(&steps) {
                debt.balance = step.ending_balance;
                breakdown.push(MonthlyPayment::record(month, &debt.id, &debt.name, step));

                if !debt.balance.is_positive() {
                    events.emit(Event::DebtPaidOff {
                        method: self.method,
                        month,
                        debt_id: debt.id.clone(),
                    });
                }
            }

            active.retain(|d| d.balance.is_positive());
            self.policy.sort(&mut active);

            if month >= self.config.max_months {
                break;
            }
        }

        let remaining_balance = if overflowed {
            Money::MAX
        } else {
            active.iter().fold(Money::ZERO, |acc, d| acc.saturating_add(d.balance))
        };
        let outcome = if active.is_empty() {
            SimulationOutcome::Completed
        } else {
            SimulationOutcome::NonConvergent
        };

        SimulationRun {
            breakdown,
            months: month,
            interest: interest_paid,
            remaining_balance,
            outcome,
        }
    }

    /// settle one month across the active set in priority order
    ///
    /// `None` when any debt's arithmetic leaves the representable range;
    /// nothing is committed for that month.
    fn settle_month(&self, active: &[WorkingDebt], extra_payment: Money) -> Option<Vec<MonthlyStep>> {
        let mut remaining_extra = extra_payment;
        let mut steps = Vec::with_capacity(active.len());

        for (index, debt) in active.iter().enumerate() {
            let mut allocation = StepAllocation::minimum(debt.balance, debt.interest_rate, debt.minimum_payment)?;

            let receives_extra =
                index == 0 || self.config.extra_payment_policy == ExtraPaymentPolicy::Waterfall;
            if receives_extra && remaining_extra.is_positive() {
                remaining_extra -= allocation.apply_extra(remaining_extra);
            }

            steps.push(allocation.settle()?);
        }

        Some(steps)
    }
}

/// sum of every minimum plus the extra payment
pub fn starting_payment(debts: &[DebtInput], extra_payment: Money) -> Money {
    debts.iter().map(|d| d.minimum_payment).sum::<Money>() + extra_payment
}

/// emit the terminal event for a finished calculation
pub(crate) fn finish(calculation: &DebtCalculation, events: &mut EventStore) {
    match calculation.outcome {
        SimulationOutcome::Completed => {
            debug!(
                "{} finished in {} months, interest {}",
                calculation.method, calculation.payoff_time, calculation.total_interest
            );
            events.emit(Event::SimulationCompleted {
                method: calculation.method,
                months: calculation.payoff_time,
                total_interest: calculation.total_interest,
            });
        }
        SimulationOutcome::NonConvergent => {
            warn!(
                "{} did not converge after {} months, {} still owed",
                calculation.method, calculation.payoff_time, calculation.total_debt
            );
            events.emit(Event::SimulationAborted {
                method: calculation.method,
                months: calculation.payoff_time,
                remaining_balance: calculation.total_debt,
            });
        }
    }
}
