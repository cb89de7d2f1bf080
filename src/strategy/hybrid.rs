use log::debug;

use crate::config::PlannerConfig;
use crate::debt::DebtInput;
use crate::decimal::Money;
use crate::events::{Event, EventStore};
use crate::payments::DebtCalculation;
use crate::types::{DebtMethod, SimulationOutcome};

use super::ordering::OrderingPolicy;
use super::simulator::{finish, starting_payment, SimulationRun, StrategySimulator};

/// split of a debt set into quick wins and the remainder
#[derive(Debug, Clone, PartialEq)]
pub struct HybridPartition {
    /// paid off first, smallest balance first
    pub quick_wins: Vec<DebtInput>,
    /// paid off afterwards, highest rate first
    pub remainder: Vec<DebtInput>,
}

impl HybridPartition {
    /// take the N smallest balances and keep those below the ceiling
    pub fn split(debts: &[DebtInput], config: &PlannerConfig) -> Self {
        let mut by_balance = debts.to_vec();
        OrderingPolicy::Snowball.sort(&mut by_balance);

        let quick_wins: Vec<DebtInput> = by_balance
            .into_iter()
            .take(config.hybrid.phase_one_candidates)
            .filter(|d| d.balance < config.hybrid.small_debt_ceiling)
            .collect();

        let remainder = debts
            .iter()
            .filter(|d| !quick_wins.iter().any(|q| q.id == d.id))
            .cloned()
            .collect();

        Self {
            quick_wins,
            remainder,
        }
    }
}

/// snowball over a few small debts, then avalanche over the rest
///
/// Phase two starts from the remaining debts' original balances and runs
/// after phase one on a shifted timeline; it does not see interest those
/// debts would have accrued while phase one was running.
pub struct HybridComposer<'a> {
    config: &'a PlannerConfig,
}

impl<'a> HybridComposer<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, debts: &[DebtInput], extra_payment: Money, events: &mut EventStore) -> DebtCalculation {
        let partition = HybridPartition::split(debts, self.config);

        if partition.quick_wins.is_empty() {
            debug!("hybrid: no debt under {}, using avalanche", self.config.hybrid.small_debt_ceiling);
            return StrategySimulator::new(OrderingPolicy::Avalanche, self.config)
                .labelled(DebtMethod::Hybrid)
                .run(debts, extra_payment, events);
        }

        let total_balance = debts
            .iter()
            .fold(Money::ZERO, |acc, d| acc.saturating_add(d.balance.max(Money::ZERO)));
        events.emit(Event::SimulationStarted {
            method: DebtMethod::Hybrid,
            debt_count: debts.len(),
            total_balance,
            extra_payment,
        });

        let phase_one = StrategySimulator::new(OrderingPolicy::Snowball, self.config)
            .labelled(DebtMethod::Hybrid)
            .simulate_months(&partition.quick_wins, extra_payment, events);
        self.phase_completed(1, &phase_one, &partition.quick_wins, events);

        let phase_two_extra = if self.config.hybrid.roll_phase_one_minimums {
            extra_payment + partition.quick_wins.iter().map(|d| d.minimum_payment).sum::<Money>()
        } else {
            extra_payment
        };
        let mut phase_two = StrategySimulator::new(OrderingPolicy::Avalanche, self.config)
            .labelled(DebtMethod::Hybrid)
            .simulate_months(&partition.remainder, phase_two_extra, events);
        self.phase_completed(2, &phase_two, &partition.remainder, events);

        for line in phase_two.breakdown.iter_mut() {
            line.month += phase_one.months;
        }

        let outcome = match (phase_one.outcome, phase_two.outcome) {
            (SimulationOutcome::Completed, SimulationOutcome::Completed) => SimulationOutcome::Completed,
            _ => SimulationOutcome::NonConvergent,
        };

        let mut monthly_breakdown = phase_one.breakdown;
        monthly_breakdown.append(&mut phase_two.breakdown);

        let calculation = DebtCalculation {
            method: DebtMethod::Hybrid,
            total_debt: phase_one.remaining_balance.saturating_add(phase_two.remaining_balance).to_cents(),
            monthly_payment: starting_payment(debts, extra_payment),
            payoff_time: phase_one.months + phase_two.months,
            // each phase is rounded on its own before the two are added
            total_interest: phase_one.interest.to_cents().saturating_add(phase_two.interest.to_cents()).to_cents(),
            monthly_breakdown,
            outcome,
        };
        finish(&calculation, events);
        calculation
    }

    fn phase_completed(&self, phase: u8, run: &SimulationRun, debts: &[DebtInput], events: &mut EventStore) {
        debug!("hybrid phase {} took {} months", phase, run.months);
        events.emit(Event::HybridPhaseCompleted {
            phase,
            months: run.months,
            debt_ids: debts.iter().map(|d| d.id.clone()).collect(),
        });
    }
}
