/// basic usage - avalanche payoff plan for two debts
use debt_payoff_rs::{DebtCalculator, DebtInput, Money, Rate, SafeTimeProvider, TimeSource};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== basic usage example ===\n");

    let mut calculator = DebtCalculator::builder()
        .debt(DebtInput::new(
            "card",
            "Credit Card",
            Money::from_major(5_000),
            Rate::from_apr(dec!(18.99)),
            Money::from_major(150),
        ))
        .debt(DebtInput::new(
            "car",
            "Car Loan",
            Money::from_major(25_000),
            Rate::from_apr(dec!(6.5)),
            Money::from_major(300),
        ))
        .extra_payment(Money::from_major(200))
        .build()?;

    let plan = calculator.avalanche();
    println!("method: {}", plan.method);
    println!("monthly payment: ${}", plan.monthly_payment);
    println!("payoff: {} months", plan.payoff_time);
    println!("total interest: ${}", plan.total_interest);

    println!("\nfirst month:");
    for line in plan.month(1) {
        println!(
            "  {:<12} paid ${:>8}  interest ${:>7}  left ${:>9}",
            line.debt_name, line.payment, line.interest, line.remaining_balance
        );
    }

    if let Some(month) = plan.payoff_month("card") {
        println!("\ncredit card cleared in month {}", month);
    }

    // production: use system time
    let time = SafeTimeProvider::new(TimeSource::System);
    let summary = calculator.summary(&time)?;
    println!("\nsummary:");
    println!("  total debt: ${}", summary.total_debt);
    println!("  average rate: {}%", summary.average_interest_rate);
    println!("  debt free by: {}", summary.estimated_payoff_date);

    Ok(())
}
