use rust_decimal::Decimal;

use crate::decimal::{compound_factor, Money, Rate};

/// one month of payment allocation on a single debt, before it is settled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepAllocation {
    pub beginning_balance: Money,
    pub interest: Money,
    pub payment: Money,
    pub principal: Money,
}

/// settled result of a month on a single debt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyStep {
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub ending_balance: Money,
}

impl StepAllocation {
    /// accrue a month of interest and pay the contractual minimum
    ///
    /// `None` when the accrued interest leaves the representable range.
    pub fn minimum(balance: Money, annual_rate: Rate, minimum_payment: Money) -> Option<Self> {
        Self::with_payment(balance, annual_rate, minimum_payment)
    }

    /// accrue a month of interest and pay a fixed amount
    pub fn with_payment(balance: Money, annual_rate: Rate, payment: Money) -> Option<Self> {
        let interest = balance.monthly_interest(annual_rate)?;
        Some(Self {
            beginning_balance: balance,
            interest,
            payment,
            principal: payment.checked_sub(interest)?,
        })
    }

    /// principal still owed after the current allocation
    pub fn principal_need(&self) -> Money {
        self.beginning_balance.saturating_sub(self.principal).max(Money::ZERO)
    }

    /// put up to `available` extra towards principal; returns the amount used
    pub fn apply_extra(&mut self, available: Money) -> Money {
        let applied = available.min(self.principal_need()).max(Money::ZERO);
        self.payment += applied;
        self.principal += applied;
        applied
    }

    /// apply the overpay guard and compute the ending balance
    ///
    /// `None` when a negatively amortizing balance outgrows the representable range.
    pub fn settle(self) -> Option<MonthlyStep> {
        let (payment, principal) = if self.principal > self.beginning_balance {
            (self.beginning_balance.checked_add(self.interest)?, self.beginning_balance)
        } else {
            (self.payment, self.principal)
        };

        Some(MonthlyStep {
            payment,
            principal,
            interest: self.interest,
            ending_balance: self.beginning_balance.checked_sub(principal)?.max(Money::ZERO),
        })
    }
}

/// level monthly payment that retires `principal` over `months`
///
/// payment = P * r * (1 + r)^n / ((1 + r)^n - 1), r = APR / 12.
/// `None` when (1 + r)^n or the numerator leaves the representable range.
pub fn annuity_payment(principal: Money, annual_rate: Rate, months: u32) -> Option<Money> {
    if months == 0 {
        return Some(principal);
    }

    let r = annual_rate.monthly_rate().as_decimal();
    if r.is_zero() {
        return Some(principal / Decimal::from(months));
    }

    let compound = compound_factor(r, months)?;
    let numerator = principal.as_decimal().checked_mul(r)?.checked_mul(compound)?;
    let denominator = compound - Decimal::ONE;

    numerator.checked_div(denominator).map(Money::from_decimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minimum_split() {
        let step = StepAllocation::minimum(
            Money::from_major(25_000),
            Rate::from_apr(dec!(6.5)),
            Money::from_major(300),
        )
        .unwrap();

        assert_eq!(step.interest.to_cents().as_decimal(), dec!(135.42));
        assert_eq!(step.principal.to_cents().as_decimal(), dec!(164.58));

        let settled = step.settle().unwrap();
        assert_eq!(settled.payment, Money::from_major(300));
        assert_eq!(settled.ending_balance.to_cents().as_decimal(), dec!(24835.42));
    }

    #[test]
    fn test_extra_is_capped_at_principal_need() {
        let mut step = StepAllocation::minimum(
            Money::from_major(100),
            Rate::from_apr(dec!(12)),
            Money::from_major(50),
        )
        .unwrap();
        // interest 1.00, principal 49.00, need 51.00
        let applied = step.apply_extra(Money::from_major(200));
        assert_eq!(applied, Money::from_major(51));
        assert_eq!(step.principal, Money::from_major(100));

        let settled = step.settle().unwrap();
        assert_eq!(settled.payment, Money::from_major(101));
        assert_eq!(settled.ending_balance, Money::ZERO);
    }

    #[test]
    fn test_overpay_guard() {
        // minimum exceeds what is owed
        let step = StepAllocation::minimum(
            Money::from_major(40),
            Rate::from_apr(dec!(12)),
            Money::from_major(100),
        )
        .unwrap();
        assert_eq!(step.principal_need(), Money::ZERO);

        let settled = step.settle().unwrap();
        assert_eq!(settled.principal, Money::from_major(40));
        assert_eq!(settled.interest, Money::from_cents(40));
        assert_eq!(settled.payment, Money::from_cents(4_040));
        assert_eq!(settled.ending_balance, Money::ZERO);
    }

    #[test]
    fn test_negative_amortization_grows_balance() {
        let settled = StepAllocation::minimum(
            Money::from_major(10_000),
            Rate::from_apr(dec!(24)),
            Money::from_major(150),
        )
        .and_then(StepAllocation::settle)
        .unwrap();

        assert!(settled.principal.is_negative());
        assert_eq!(settled.ending_balance, Money::from_major(10_050));
    }

    #[test]
    fn test_annuity_payment() {
        let payment = annuity_payment(Money::from_major(30_000), Rate::from_apr(dec!(6.5)), 60).unwrap();
        assert_eq!(payment.to_cents().as_decimal(), dec!(586.98));

        let flat = annuity_payment(Money::from_major(1_200), Rate::ZERO, 12);
        assert_eq!(flat, Some(Money::from_major(100)));

        assert_eq!(annuity_payment(Money::from_major(500), Rate::from_apr(dec!(5)), 0), Some(Money::from_major(500)));
    }

    #[test]
    fn test_annuity_payment_out_of_range() {
        // 2% a month compounded over 6000 months does not fit in a decimal
        assert_eq!(annuity_payment(Money::from_major(30_000), Rate::from_apr(dec!(24)), 6_000), None);
    }

    #[test]
    fn test_settle_past_range_is_none() {
        // 25% a month on a balance at the top of the range
        let huge = Money::MAX.saturating_sub(Money::from_major(1));
        let step = StepAllocation::minimum(huge, Rate::from_apr(dec!(300)), Money::from_major(10)).unwrap();

        assert!(step.principal.is_negative());
        assert_eq!(step.principal_need(), Money::MAX);
        assert_eq!(step.settle(), None);
    }
}
