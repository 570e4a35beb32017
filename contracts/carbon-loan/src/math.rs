//! Fixed-point loan arithmetic.
//!
//! Amounts are `i128` with 18 decimals. APY is a whole percent and fees are
//! basis points. Every division truncates toward zero.

use crate::Error;

/// Exponent applied to the yearly rate when computing the total loan value.
/// Fixed regardless of the amortization term.
pub const COMPOUNDING_PERIODS: u32 = 3;
pub const BASIS_POINTS: i128 = 10_000;
const PERCENT: i128 = 100;

/// `principal * (100 + apy)^n / 100^n`
pub fn calculate_total_loan_value(
    principal: i128,
    apy: u32,
    compounding_periods: u32,
) -> Result<i128, Error> {
    let rate = PERCENT
        .checked_add(i128::from(apy))
        .ok_or(Error::ArithmeticError)?;
    let numerator = rate
        .checked_pow(compounding_periods)
        .ok_or(Error::ArithmeticError)?;
    let denominator = PERCENT
        .checked_pow(compounding_periods)
        .ok_or(Error::ArithmeticError)?;
    let grown = principal
        .checked_mul(numerator)
        .ok_or(Error::ArithmeticError)?;
    Ok(grown / denominator)
}

/// Splits `amount / periods` into `(net, fee)` where `fee` is
/// `transaction_bps` of the gross installment and `net + fee` equals it exactly.
pub fn calculate_monthly_payment(
    amount: i128,
    periods: u32,
    transaction_bps: u32,
) -> Result<(i128, i128), Error> {
    if periods == 0 {
        return Err(Error::InvalidLoanTerms);
    }
    let gross = amount / i128::from(periods);
    let fee = gross
        .checked_mul(i128::from(transaction_bps))
        .ok_or(Error::ArithmeticError)?
        / BASIS_POINTS;
    let net = gross.checked_sub(fee).ok_or(Error::ArithmeticError)?;
    Ok((net, fee))
}

/// Profit of selling `credits` at `price` against `principal`, as an absolute
/// amount and in basis points of the principal. Both may be negative.
pub fn calculate_profit(credits: i128, price: i128, principal: i128) -> Result<(i128, i128), Error> {
    if principal <= 0 {
        return Err(Error::InvalidLoanTerms);
    }
    let value = credits.checked_mul(price).ok_or(Error::ArithmeticError)?;
    let profit = value.checked_sub(principal).ok_or(Error::ArithmeticError)?;
    let profit_bps = profit
        .checked_mul(BASIS_POINTS)
        .ok_or(Error::ArithmeticError)?
        / principal;
    Ok((profit, profit_bps))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: i128 = 1_000_000_000_000_000_000;

    #[test]
    fn total_loan_value_compounds_three_periods() {
        let tlv = calculate_total_loan_value(1000 * ONE, 14, COMPOUNDING_PERIODS).unwrap();
        assert_eq!(tlv, 1_481_544_000_000_000_000_000);

        let flat = calculate_total_loan_value(1000 * ONE, 0, COMPOUNDING_PERIODS).unwrap();
        assert_eq!(flat, 1000 * ONE);
    }

    #[test]
    fn total_loan_value_overflow() {
        assert_eq!(
            calculate_total_loan_value(i128::MAX / 2, 14, COMPOUNDING_PERIODS),
            Err(Error::ArithmeticError)
        );
    }

    #[test]
    fn monthly_payment_splits_fee() {
        let (net, fee) = calculate_monthly_payment(1_481_544_000_000_000_000_000, 36, 80).unwrap();
        assert_eq!(fee, 329_232_000_000_000_000);
        assert_eq!(net, 40_824_768_000_000_000_000);
        assert_eq!(net + fee, 41_154_000_000_000_000_000);
    }

    #[test]
    fn monthly_payment_truncates() {
        let (net, fee) = calculate_monthly_payment(100, 3, 0).unwrap();
        assert_eq!((net, fee), (33, 0));

        let (net, fee) = calculate_monthly_payment(100, 1, 10_000).unwrap();
        assert_eq!((net, fee), (0, 100));
    }

    #[test]
    fn monthly_payment_rejects_zero_periods() {
        assert_eq!(
            calculate_monthly_payment(1000, 0, 80),
            Err(Error::InvalidLoanTerms)
        );
    }

    #[test]
    fn profit_in_basis_points() {
        let principal = 1000 * ONE;
        assert_eq!(
            calculate_profit(25, 52_860_000_000_000_000_000, principal).unwrap(),
            (321_500_000_000_000_000_000, 3215)
        );
        assert_eq!(
            calculate_profit(25, 62 * ONE, principal).unwrap(),
            (550 * ONE, 5500)
        );
        assert_eq!(
            calculate_profit(25, 50 * ONE, principal).unwrap(),
            (250 * ONE, 2500)
        );
    }

    #[test]
    fn profit_can_be_negative() {
        assert_eq!(
            calculate_profit(10, 50 * ONE, 1000 * ONE).unwrap(),
            (-500 * ONE, -5000)
        );
    }
}
