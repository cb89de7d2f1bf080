use chrono::Months;
use hourglass_rs::SafeTimeProvider;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::consolidation::ConsolidationCalculator;
use crate::debt::{highest_interest, lowest_balance, weighted_average_rate, DebtInput, DebtProfile, DebtSummary};
use crate::decimal::{Money, Rate};
use crate::errors::{PayoffError, Result};
use crate::events::{Event, EventStore};
use crate::payments::DebtCalculation;
use crate::recommendation::{comparison_recommendation, recommend_for_profile, Recommendation};
use crate::strategy::{HybridComposer, OrderingPolicy, StrategySimulator};
use crate::types::{DebtMethod, StressLevel};

/// snowball, avalanche and hybrid side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodComparison {
    pub snowball: DebtCalculation,
    pub avalanche: DebtCalculation,
    pub hybrid: DebtCalculation,
    pub recommendation: Recommendation,
}

impl MethodComparison {
    pub fn get(&self, method: DebtMethod) -> Option<&DebtCalculation> {
        match method {
            DebtMethod::Snowball => Some(&self.snowball),
            DebtMethod::Avalanche => Some(&self.avalanche),
            DebtMethod::Hybrid => Some(&self.hybrid),
            DebtMethod::Consolidation => None,
        }
    }

    /// the recommended method's calculation
    pub fn recommended(&self) -> &DebtCalculation {
        self.get(self.recommendation.method).unwrap_or(&self.avalanche)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// payoff planner over one validated debt set
///
/// Every simulation run through the calculator appends its events to one
/// store. They accumulate across calls until drained with
/// [`DebtCalculator::take_events`]; long-lived callers should drain after
/// each run they care about.
#[derive(Debug)]
pub struct DebtCalculator {
    debts: Vec<DebtInput>,
    extra_payment: Money,
    config: PlannerConfig,
    events: EventStore,
}

impl DebtCalculator {
    /// validate inputs with the reference configuration
    pub fn new(debts: Vec<DebtInput>, extra_payment: Money) -> Result<Self> {
        Self::with_config(debts, extra_payment, PlannerConfig::default())
    }

    pub fn with_config(debts: Vec<DebtInput>, extra_payment: Money, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        validate_inputs(&debts, extra_payment)?;
        Ok(Self {
            debts,
            extra_payment,
            config,
            events: EventStore::new(),
        })
    }

    pub fn builder() -> DebtCalculatorBuilder {
        DebtCalculatorBuilder::new()
    }

    pub fn debts(&self) -> &[DebtInput] {
        &self.debts
    }

    pub fn extra_payment(&self) -> Money {
        self.extra_payment
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn snowball(&mut self) -> DebtCalculation {
        StrategySimulator::new(OrderingPolicy::Snowball, &self.config)
            .run(&self.debts, self.extra_payment, &mut self.events)
    }

    pub fn avalanche(&mut self) -> DebtCalculation {
        StrategySimulator::new(OrderingPolicy::Avalanche, &self.config)
            .run(&self.debts, self.extra_payment, &mut self.events)
    }

    pub fn hybrid(&mut self) -> DebtCalculation {
        HybridComposer::new(&self.config).run(&self.debts, self.extra_payment, &mut self.events)
    }

    /// run one of the ordering strategies
    pub fn simulate(&mut self, method: DebtMethod) -> Result<DebtCalculation> {
        match method {
            DebtMethod::Snowball => Ok(self.snowball()),
            DebtMethod::Avalanche => Ok(self.avalanche()),
            DebtMethod::Hybrid => Ok(self.hybrid()),
            DebtMethod::Consolidation => Err(PayoffError::InvalidConfiguration {
                message: "consolidation needs a rate and term, use calculate_consolidation".to_string(),
            }),
        }
    }

    pub fn calculate_consolidation(&mut self, annual_rate: Rate, term_months: u32) -> Result<DebtCalculation> {
        let calculator = ConsolidationCalculator::new(annual_rate, term_months)?;
        calculator.calculate(&self.debts, &mut self.events)
    }

    /// simulate all three strategies and pick one
    pub fn compare_all_methods(&mut self) -> MethodComparison {
        let snowball = self.snowball();
        let avalanche = self.avalanche();
        let hybrid = self.hybrid();
        let recommendation =
            comparison_recommendation(&self.debts, &snowball, &avalanche, &self.config.recommendation);
        debug!("comparison recommends {}", recommendation.method);

        MethodComparison {
            snowball,
            avalanche,
            hybrid,
            recommendation,
        }
    }

    /// dashboard recommendation for this debt set
    pub fn recommend(&self, stress: StressLevel) -> Recommendation {
        recommend_for_profile(stress, &self.profile(), &self.config.recommendation)
    }

    pub fn profile(&self) -> DebtProfile {
        DebtProfile::from_debts(&self.debts, self.config.recommendation.small_debt_threshold)
    }

    /// aggregate snapshot with an avalanche payoff estimate
    pub fn summary(&mut self, time_provider: &SafeTimeProvider) -> Result<DebtSummary> {
        let highest = highest_interest(&self.debts).ok_or(PayoffError::EmptyDebtSet)?.id.clone();
        let lowest = lowest_balance(&self.debts).ok_or(PayoffError::EmptyDebtSet)?.id.clone();

        let avalanche = self.avalanche();
        let today = time_provider.now().date_naive();
        let estimated_payoff_date = today
            .checked_add_months(Months::new(avalanche.payoff_time))
            .ok_or(PayoffError::DateOutOfRange {
                months: avalanche.payoff_time,
            })?;

        Ok(DebtSummary {
            total_debt: self.debts.iter().map(|d| d.balance).sum(),
            monthly_minimum: self.debts.iter().map(|d| d.minimum_payment).sum(),
            available_extra: self.extra_payment,
            average_interest_rate: weighted_average_rate(&self.debts),
            highest_interest_debt: highest,
            lowest_balance_debt: lowest,
            payoff_months: avalanche.payoff_time,
            converged: avalanche.is_converged(),
            estimated_payoff_date,
        })
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

/// builder for payoff calculators
#[derive(Debug, Default)]
pub struct DebtCalculatorBuilder {
    debts: Vec<DebtInput>,
    extra_payment: Option<Money>,
    config: Option<PlannerConfig>,
}

impl DebtCalculatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debt(mut self, debt: DebtInput) -> Self {
        self.debts.push(debt);
        self
    }

    pub fn debts(mut self, debts: impl IntoIterator<Item = DebtInput>) -> Self {
        self.debts.extend(debts);
        self
    }

    pub fn extra_payment(mut self, amount: Money) -> Self {
        self.extra_payment = Some(amount);
        self
    }

    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<DebtCalculator> {
        DebtCalculator::with_config(
            self.debts,
            self.extra_payment.unwrap_or(Money::ZERO),
            self.config.unwrap_or_default(),
        )
    }
}

fn validate_inputs(debts: &[DebtInput], extra_payment: Money) -> Result<()> {
    if extra_payment.is_negative() {
        return Err(PayoffError::InvalidExtraPayment { amount: extra_payment });
    }
    debts.iter().try_for_each(DebtInput::validate)
}

/// run a strategy over a debt set
pub fn simulate(
    debts: &[DebtInput],
    extra_payment: Money,
    method: DebtMethod,
    config: &PlannerConfig,
) -> Result<DebtCalculation> {
    DebtCalculator::with_config(debts.to_vec(), extra_payment, config.clone())?.simulate(method)
}

/// replace a debt set with one amortizing loan
pub fn calculate_consolidation(debts: &[DebtInput], annual_rate: Rate, term_months: u32) -> Result<DebtCalculation> {
    DebtCalculator::new(debts.to_vec(), Money::ZERO)?.calculate_consolidation(annual_rate, term_months)
}

/// plan over the usable subset of a debt list
///
/// Debts without a positive balance, without a positive minimum payment, or
/// with a negative rate are left out. Returns `None` when nothing usable remains.
pub fn calculate_payoff_plan(
    debts: &[DebtInput],
    method: DebtMethod,
    extra_payment: Money,
    config: &PlannerConfig,
) -> Result<Option<DebtCalculation>> {
    let usable: Vec<DebtInput> = debts
        .iter()
        .filter(|d| d.balance.is_positive() && d.minimum_payment.is_positive() && !d.interest_rate.is_negative())
        .cloned()
        .collect();

    if usable.is_empty() {
        debug!("payoff plan: none of {} debts are usable", debts.len());
        return Ok(None);
    }

    simulate(&usable, extra_payment, method, config).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use crate::types::SimulationOutcome;

    fn debt(id: &str, balance: i64, apr: Decimal, minimum: i64) -> DebtInput {
        DebtInput::new(id, id, Money::from_major(balance), Rate::from_apr(apr), Money::from_major(minimum))
    }

    fn two_debts() -> Vec<DebtInput> {
        vec![debt("card", 5_000, dec!(18.99), 150), debt("car", 25_000, dec!(6.5), 300)]
    }

    fn three_debts() -> Vec<DebtInput> {
        vec![
            debt("card", 8_000, dec!(22.99), 200),
            debt("store", 1_500, dec!(9.99), 50),
            debt("loan", 12_000, dec!(7.5), 250),
        ]
    }

    #[test]
    fn test_builder_validates() {
        let calc = DebtCalculator::builder()
            .debts(two_debts())
            .extra_payment(Money::from_major(200))
            .build()
            .unwrap();
        assert_eq!(calc.debts().len(), 2);
        assert_eq!(calc.extra_payment(), Money::from_major(200));

        let err = DebtCalculator::builder()
            .debt(debt("bad", -100, dec!(5), 10))
            .build()
            .unwrap_err();
        assert!(matches!(err, PayoffError::InvalidDebt { .. }));

        let err = DebtCalculator::new(two_debts(), Money::from_major(-1)).unwrap_err();
        assert!(matches!(err, PayoffError::InvalidExtraPayment { .. }));
    }

    #[test]
    fn test_simulate_dispatch() {
        let mut calc = DebtCalculator::new(three_debts(), Money::from_major(300)).unwrap();

        assert_eq!(calc.simulate(DebtMethod::Snowball).unwrap().method, DebtMethod::Snowball);
        assert_eq!(calc.simulate(DebtMethod::Avalanche).unwrap().method, DebtMethod::Avalanche);
        assert_eq!(calc.simulate(DebtMethod::Hybrid).unwrap().method, DebtMethod::Hybrid);
        assert!(calc.simulate(DebtMethod::Consolidation).is_err());
        assert!(!calc.events().is_empty());
    }

    #[test]
    fn test_compare_all_methods() {
        let mut calc = DebtCalculator::new(three_debts(), Money::from_major(300)).unwrap();
        let comparison = calc.compare_all_methods();

        assert_eq!(comparison.snowball.payoff_time, 39);
        assert_eq!(comparison.avalanche.payoff_time, 38);
        assert!(comparison.avalanche.total_interest <= comparison.snowball.total_interest);
        assert_eq!(comparison.hybrid.method, DebtMethod::Hybrid);

        // savings under the threshold, too few debts for hybrid, one small balance
        assert_eq!(comparison.recommendation.method, DebtMethod::Avalanche);
        assert_eq!(comparison.recommended().method, DebtMethod::Avalanche);

        let json = comparison.to_json_pretty().unwrap();
        assert!(json.contains("\"heuristic\": \"comparison\""));
    }

    #[test]
    fn test_same_order_gives_same_result() {
        // the card is both the smallest balance and the highest rate
        let mut calc = DebtCalculator::new(two_debts(), Money::from_major(200)).unwrap();
        let comparison = calc.compare_all_methods();

        assert_eq!(comparison.snowball.monthly_breakdown, comparison.avalanche.monthly_breakdown);
        assert_eq!(comparison.snowball.total_interest.as_decimal(), dec!(6114.18));
        // no balance under 5000, so hybrid is avalanche
        assert_eq!(comparison.hybrid.monthly_breakdown, comparison.avalanche.monthly_breakdown);
    }

    #[test]
    fn test_consolidation_through_facade() {
        let mut calc = DebtCalculator::new(two_debts(), Money::ZERO).unwrap();
        let result = calc.calculate_consolidation(Rate::from_apr(dec!(6.5)), 60).unwrap();
        assert_eq!(result.monthly_payment.as_decimal(), dec!(586.98));

        assert!(calc.calculate_consolidation(Rate::from_apr(dec!(6.5)), 0).is_err());
        assert!(calculate_consolidation(&two_debts(), Rate::from_apr(dec!(6.5)), 60).is_ok());
    }

    #[test]
    fn test_summary() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        ));
        let mut calc = DebtCalculator::new(two_debts(), Money::from_major(200)).unwrap();
        let summary = calc.summary(&time).unwrap();

        assert_eq!(summary.total_debt, Money::from_major(30_000));
        assert_eq!(summary.monthly_minimum, Money::from_major(450));
        assert_eq!(summary.available_extra, Money::from_major(200));
        assert_eq!(summary.average_interest_rate, dec!(8.58));
        assert_eq!(summary.highest_interest_debt, "card");
        assert_eq!(summary.lowest_balance_debt, "card");
        assert_eq!(summary.payoff_months, 68);
        assert!(summary.converged);
        assert_eq!(summary.estimated_payoff_date, NaiveDate::from_ymd_opt(2029, 9, 15).unwrap());
    }

    #[test]
    fn test_summary_of_nothing_is_an_error() {
        let time = SafeTimeProvider::new(TimeSource::Test(Utc::now()));
        let mut calc = DebtCalculator::new(Vec::new(), Money::ZERO).unwrap();
        assert!(matches!(calc.summary(&time), Err(PayoffError::EmptyDebtSet)));
    }

    #[test]
    fn test_payoff_plan_filters_unusable_debts() {
        let config = PlannerConfig::default();
        let mut debts = three_debts();
        debts.push(debt("paid", 0, dec!(19.99), 25));
        debts.push(debt("no-minimum", 700, dec!(5), 0));

        let plan = calculate_payoff_plan(&debts, DebtMethod::Avalanche, Money::from_major(300), &config)
            .unwrap()
            .unwrap();
        assert_eq!(plan.payoff_time, 38);
        assert_eq!(plan.payments_for("no-minimum").count(), 0);
        assert_eq!(plan.monthly_payment, Money::from_major(800));

        let nothing = calculate_payoff_plan(
            &[debt("paid", 0, dec!(19.99), 25)],
            DebtMethod::Snowball,
            Money::ZERO,
            &config,
        )
        .unwrap();
        assert!(nothing.is_none());
    }

    #[test]
    fn test_schedule_properties_hold_for_every_method() {
        for method in [DebtMethod::Snowball, DebtMethod::Avalanche, DebtMethod::Hybrid] {
            let mut previous: Option<DebtCalculation> = None;
            for extra in [0, 50, 150, 300, 600] {
                let result = simulate(&three_debts(), Money::from_major(extra), method, &PlannerConfig::default())
                    .unwrap();
                assert!(result.is_converged(), "{} extra {}", method, extra);

                for line in &result.monthly_breakdown {
                    let drift = (line.payment - (line.principal + line.interest)).abs();
                    assert!(drift <= Money::CENT, "{} month {} {}: drift {}", method, line.month, line.debt_id, drift);
                    assert!(!line.remaining_balance.is_negative());
                }

                // more extra is never slower nor dearer
                if let Some(prev) = &previous {
                    assert!(result.payoff_time <= prev.payoff_time, "{} extra {}", method, extra);
                    assert!(result.total_interest <= prev.total_interest, "{} extra {}", method, extra);
                }
                previous = Some(result);
            }
        }
    }

    #[test]
    fn test_runaway_balance_stops_without_panicking() {
        // 25% a month against a 10 minimum grows past the decimal range in under 300 months
        let debts = vec![debt("runaway", 1_000, dec!(300), 10)];
        for method in [DebtMethod::Snowball, DebtMethod::Avalanche, DebtMethod::Hybrid] {
            let result = simulate(&debts, Money::ZERO, method, &PlannerConfig::default()).unwrap();

            assert_eq!(result.outcome, SimulationOutcome::NonConvergent, "{}", method);
            assert!(result.payoff_time > 0 && result.payoff_time < 600, "{}: {}", method, result.payoff_time);
            assert_eq!(result.total_debt, Money::MAX);
            assert_eq!(result.monthly_breakdown.len(), result.payoff_time as usize);
        }
    }

    #[test]
    fn test_events_accumulate_until_taken() {
        let mut calc = DebtCalculator::new(two_debts(), Money::from_major(200)).unwrap();
        let _ = calc.avalanche();
        let one_run = calc.events().len();
        assert!(one_run > 0);

        let _ = calc.avalanche();
        assert_eq!(calc.events().len(), 2 * one_run);

        assert_eq!(calc.take_events().len(), 2 * one_run);
        assert!(calc.events().is_empty());
    }

    #[test]
    fn test_recommend_uses_dashboard_rules() {
        let calc = DebtCalculator::new(three_debts(), Money::from_major(300)).unwrap();
        // a 15.49 point spread wins over moderate stress
        let rec = calc.recommend(StressLevel::new(5).unwrap());
        assert_eq!(rec.method, DebtMethod::Avalanche);
        // high stress, three debts, one under 2000
        let rec = calc.recommend(StressLevel::new(9).unwrap());
        assert_eq!(rec.method, DebtMethod::Snowball);
    }
}
