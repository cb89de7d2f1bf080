/// consolidation vs the best ordering strategy
use debt_payoff_rs::{DebtCalculator, DebtInput, Money, Rate};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== consolidation example ===\n");

    let mut calculator = DebtCalculator::new(
        vec![
            DebtInput::new("card", "Credit Card", Money::from_major(5_000), Rate::from_apr(dec!(18.99)), Money::from_major(150)),
            DebtInput::new("car", "Car Loan", Money::from_major(25_000), Rate::from_apr(dec!(6.5)), Money::from_major(300)),
        ],
        Money::ZERO,
    )?;

    for term in [36, 60, 84] {
        let loan = calculator.calculate_consolidation(Rate::from_apr(dec!(6.5)), term)?;
        println!(
            "{} months: ${} per month, ${} interest",
            term, loan.monthly_payment, loan.total_interest
        );
    }

    let avalanche = calculator.avalanche();
    println!(
        "\nminimums only, avalanche: {} months, ${} interest",
        avalanche.payoff_time, avalanche.total_interest
    );

    match calculator.calculate_consolidation(Rate::from_apr(dec!(6.5)), 0) {
        Ok(_) => println!("unexpected: zero term accepted"),
        Err(e) => println!("zero term rejected: {}", e),
    }

    Ok(())
}
