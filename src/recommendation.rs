use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RecommendationConfig;
use crate::debt::{DebtInput, DebtProfile};
use crate::decimal::Money;
use crate::payments::DebtCalculation;
use crate::types::{DebtMethod, StressLevel};

/// which rule table produced a recommendation
///
/// The three tables use different inputs and thresholds. An assessment can
/// recommend snowball for a debt set the dashboard table sends to avalanche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// stress, debt count, small debts and rate spread
    Dashboard,
    /// stress and small debts only, at assessment submission
    Assessment,
    /// simulated snowball vs avalanche outcomes
    Comparison,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub method: DebtMethod,
    pub reasoning: String,
    pub heuristic: Heuristic,
}

impl Recommendation {
    fn new(heuristic: Heuristic, method: DebtMethod, reasoning: impl Into<String>) -> Self {
        Self {
            method,
            reasoning: reasoning.into(),
            heuristic,
        }
    }
}

/// dashboard rule table; first matching rule wins
pub fn recommend_strategy(
    stress: StressLevel,
    debt_count: usize,
    has_small_debt: bool,
    rate_spread: Decimal,
    config: &RecommendationConfig,
) -> Recommendation {
    let level = stress.value();

    if level >= config.high_stress && debt_count >= config.snowball_min_debts && has_small_debt {
        return Recommendation::new(
            Heuristic::Dashboard,
            DebtMethod::Snowball,
            "High stress calls for quick wins. Clearing the smallest debts first builds momentum early.",
        );
    }

    if rate_spread > config.rate_spread_threshold {
        return Recommendation::new(
            Heuristic::Dashboard,
            DebtMethod::Avalanche,
            "Your interest rates are far apart, so targeting the highest rate first saves the most interest.",
        );
    }

    if (config.moderate_stress_min..=config.moderate_stress_max).contains(&level) && has_small_debt {
        return Recommendation::new(
            Heuristic::Dashboard,
            DebtMethod::Hybrid,
            "Knock out a couple of small debts for motivation, then switch to the highest rates.",
        );
    }

    Recommendation::new(
        Heuristic::Dashboard,
        DebtMethod::Avalanche,
        "Highest rate first keeps total interest and payoff time as low as possible.",
    )
}

/// dashboard rule table fed from a debt set
pub fn recommend_for_profile(
    stress: StressLevel,
    profile: &DebtProfile,
    config: &RecommendationConfig,
) -> Recommendation {
    recommend_strategy(stress, profile.debt_count, profile.has_small_debt, profile.rate_spread, config)
}

/// rule table used when an assessment is submitted
pub fn assessment_recommendation(
    stress: StressLevel,
    has_small_debt: bool,
    config: &RecommendationConfig,
) -> Recommendation {
    let level = stress.value();

    if level >= config.high_stress || has_small_debt {
        Recommendation::new(
            Heuristic::Assessment,
            DebtMethod::Snowball,
            "Quick wins on small balances help when debt feels overwhelming.",
        )
    } else if level <= config.assessment_low_stress {
        Recommendation::new(
            Heuristic::Assessment,
            DebtMethod::Avalanche,
            "You are comfortable with your debt, so the interest-minimising order fits.",
        )
    } else {
        Recommendation::new(
            Heuristic::Assessment,
            DebtMethod::Hybrid,
            "A balanced plan: a few early wins, then the highest rates.",
        )
    }
}

/// rule table applied after snowball and avalanche have both been simulated
pub fn comparison_recommendation(
    debts: &[DebtInput],
    snowball: &DebtCalculation,
    avalanche: &DebtCalculation,
    config: &RecommendationConfig,
) -> Recommendation {
    let interest_savings = snowball.total_interest - avalanche.total_interest;
    let months_faster = i64::from(snowball.payoff_time) - i64::from(avalanche.payoff_time);

    if interest_savings > config.comparison_interest_savings
        && months_faster > i64::from(config.comparison_months_faster)
    {
        return Recommendation::new(
            Heuristic::Comparison,
            DebtMethod::Avalanche,
            format!(
                "Avalanche saves ${} in interest and finishes {} months sooner.",
                interest_savings.round_dp(0),
                months_faster
            ),
        );
    }

    if debts.len() >= config.comparison_hybrid_min_debts
        && debts.iter().any(|d| d.balance < config.comparison_hybrid_small_debt)
    {
        return Recommendation::new(
            Heuristic::Comparison,
            DebtMethod::Hybrid,
            "With several debts and some small ones, early wins followed by rate ordering balances motivation and savings.",
        );
    }

    let small = count_below(debts, config.comparison_snowball_small_debt);
    if small >= config.comparison_snowball_min_small {
        return Recommendation::new(
            Heuristic::Comparison,
            DebtMethod::Snowball,
            "Several small balances can be cleared quickly to keep you motivated.",
        );
    }

    Recommendation::new(
        Heuristic::Comparison,
        DebtMethod::Avalanche,
        "Avalanche pays the least interest overall.",
    )
}

fn count_below(debts: &[DebtInput], threshold: Money) -> usize {
    debts.iter().filter(|d| d.balance < threshold).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::SimulationOutcome;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn stress(level: u8) -> StressLevel {
        StressLevel::new(level).unwrap()
    }

    #[rstest]
    #[case(8, 3, true, dec!(10), DebtMethod::Snowball)]
    #[case(8, 2, true, dec!(10), DebtMethod::Avalanche)]
    #[case(8, 3, false, dec!(2), DebtMethod::Avalanche)]
    #[case(5, 4, true, dec!(6), DebtMethod::Avalanche)]
    #[case(5, 4, true, dec!(5), DebtMethod::Hybrid)]
    #[case(4, 1, true, dec!(0), DebtMethod::Hybrid)]
    #[case(6, 2, false, dec!(1), DebtMethod::Avalanche)]
    #[case(7, 2, true, dec!(3), DebtMethod::Avalanche)]
    #[case(2, 5, true, dec!(1), DebtMethod::Avalanche)]
    fn test_dashboard_rules(
        #[case] level: u8,
        #[case] count: usize,
        #[case] small: bool,
        #[case] spread: Decimal,
        #[case] expected: DebtMethod,
    ) {
        let rec = recommend_strategy(stress(level), count, small, spread, &RecommendationConfig::default());
        assert_eq!(rec.method, expected);
        assert_eq!(rec.heuristic, Heuristic::Dashboard);
        assert!(!rec.reasoning.is_empty());
    }

    #[rstest]
    #[case(9, false, DebtMethod::Snowball)]
    #[case(2, true, DebtMethod::Snowball)]
    #[case(4, false, DebtMethod::Avalanche)]
    #[case(1, false, DebtMethod::Avalanche)]
    #[case(5, false, DebtMethod::Hybrid)]
    #[case(6, false, DebtMethod::Hybrid)]
    fn test_assessment_rules(#[case] level: u8, #[case] small: bool, #[case] expected: DebtMethod) {
        let rec = assessment_recommendation(stress(level), small, &RecommendationConfig::default());
        assert_eq!(rec.method, expected);
        assert_eq!(rec.heuristic, Heuristic::Assessment);
    }

    #[test]
    fn test_heuristics_disagree_on_same_input() {
        // low stress with a small debt: assessment says snowball, dashboard says hybrid
        let config = RecommendationConfig::default();
        let assessment = assessment_recommendation(stress(5), true, &config);
        let dashboard = recommend_strategy(stress(5), 2, true, dec!(1), &config);
        assert_eq!(assessment.method, DebtMethod::Snowball);
        assert_eq!(dashboard.method, DebtMethod::Hybrid);
    }

    fn outcome(interest: i64, months: u32) -> DebtCalculation {
        DebtCalculation {
            total_interest: Money::from_major(interest),
            payoff_time: months,
            outcome: SimulationOutcome::Completed,
            ..DebtCalculation::empty(DebtMethod::Snowball, Money::ZERO)
        }
    }

    fn debts(balances: &[i64]) -> Vec<DebtInput> {
        balances
            .iter()
            .enumerate()
            .map(|(i, b)| {
                DebtInput::new(format!("d{i}"), format!("Debt {i}"), Money::from_major(*b), Rate::from_apr(dec!(10)), Money::from_major(50))
            })
            .collect()
    }

    #[test]
    fn test_comparison_prefers_avalanche_on_large_savings() {
        let rec = comparison_recommendation(
            &debts(&[1_000, 2_000, 5_000, 9_000]),
            &outcome(5_200, 50),
            &outcome(4_000, 40),
            &RecommendationConfig::default(),
        );
        assert_eq!(rec.method, DebtMethod::Avalanche);
        assert_eq!(rec.reasoning, "Avalanche saves $1200 in interest and finishes 10 months sooner.");
    }

    #[test]
    fn test_comparison_needs_both_savings_and_time() {
        let config = RecommendationConfig::default();
        // big savings but only 3 months faster, many debts with a small one
        let rec = comparison_recommendation(
            &debts(&[1_000, 2_500, 5_000, 9_000]),
            &outcome(5_200, 43),
            &outcome(4_000, 40),
            &config,
        );
        assert_eq!(rec.method, DebtMethod::Hybrid);
    }

    #[test]
    fn test_comparison_snowball_and_default() {
        let config = RecommendationConfig::default();
        let rec = comparison_recommendation(&debts(&[2_500, 2_900, 9_000]), &outcome(900, 30), &outcome(850, 29), &config);
        assert_eq!(rec.method, DebtMethod::Snowball);

        let rec = comparison_recommendation(&debts(&[2_500, 9_000]), &outcome(900, 30), &outcome(850, 29), &config);
        assert_eq!(rec.method, DebtMethod::Avalanche);
        assert_eq!(rec.heuristic, Heuristic::Comparison);
    }

    #[test]
    fn test_profile_feeds_dashboard() {
        let debts = debts(&[1_500, 6_000, 12_000]);
        let profile = DebtProfile::from_debts(&debts, RecommendationConfig::default().small_debt_threshold);
        let rec = recommend_for_profile(stress(8), &profile, &RecommendationConfig::default());
        assert_eq!(rec.method, DebtMethod::Snowball);
    }
}
