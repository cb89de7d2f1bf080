/// compare snowball, avalanche and hybrid on the same debts
use debt_payoff_rs::{DebtCalculator, DebtInput, DebtMethod, Money, Rate, StressLevel};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== method comparison example ===\n");

    let debts = vec![
        DebtInput::new("card", "Visa", Money::from_major(8_000), Rate::from_apr(dec!(22.99)), Money::from_major(200)),
        DebtInput::new("store", "Store Card", Money::from_major(1_500), Rate::from_apr(dec!(9.99)), Money::from_major(50)),
        DebtInput::new("loan", "Personal Loan", Money::from_major(12_000), Rate::from_apr(dec!(7.5)), Money::from_major(250)),
    ];
    let mut calculator = DebtCalculator::new(debts, Money::from_major(300))?;

    let comparison = calculator.compare_all_methods();
    for method in [DebtMethod::Snowball, DebtMethod::Avalanche, DebtMethod::Hybrid] {
        if let Some(result) = comparison.get(method) {
            println!(
                "{:<10} {:>3} months  ${:>9} interest",
                result.method, result.payoff_time, result.total_interest
            );
        }
    }

    println!(
        "\nafter simulating: {} ({})",
        comparison.recommendation.method, comparison.recommendation.reasoning
    );

    // the dashboard rule table looks at stress rather than outcomes
    for level in [3, 5, 9] {
        let rec = calculator.recommend(StressLevel::new(level)?);
        println!("stress {}: {}", level, rec.method);
    }

    println!("\n{} events emitted", calculator.take_events().len());
    Ok(())
}
