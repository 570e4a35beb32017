use soroban_sdk::{BytesN, Env, contracttype};

use crate::Error;

/// Profit, in basis points of the principal, from which a loan may be swapped
pub const SWAPPABLE_PROFIT_BPS: i128 = 3_200;
/// Profit from which a loan is swapped right away
pub const SWAP_PROFIT_BPS: i128 = 5_300;

/// Market price of one carbon credit and when it was recorded
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceSnapshot {
    pub price: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapQuote {
    pub price: PriceSnapshot,
    pub credits_staked: i128,
    pub profit: i128,
    pub profit_bps: i128,
}

/// Result of evaluating a taken loan against the current price
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapDecision {
    NotSwappable,
    Swappable,
    Swapped,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SwapOutcome {
    Swapped,
    /// Price fell below the swappable threshold since evaluation; the loan
    /// went back to `Taken`
    NoLongerSwappable,
}

pub fn classify(profit_bps: i128) -> SwapDecision {
    if profit_bps >= SWAP_PROFIT_BPS {
        SwapDecision::Swapped
    } else if profit_bps >= SWAPPABLE_PROFIT_BPS {
        SwapDecision::Swappable
    } else {
        SwapDecision::NotSwappable
    }
}

/// Closing loans by delivering their pledged carbon credits to the lender.
pub trait IsSwapEvaluator {
    /// Record the current carbon credit price. Admin-only.
    fn set_carbon_credit_price(env: &Env, price: i128) -> Result<(), Error>;

    fn carbon_credit_price(env: &Env) -> PriceSnapshot;

    /// Compare the pledged credits at the current price against the principal
    /// of a taken loan and move it to `Swappable` or `Swapped` when the profit
    /// clears the thresholds. Admin-only.
    fn evaluate_swap_state(env: &Env, token_id: BytesN<32>) -> Result<SwapDecision, Error>;

    /// Quote recorded by the last evaluation that made the loan swappable
    fn swap_quote(env: &Env, token_id: BytesN<32>) -> Result<Option<SwapQuote>, Error>;

    /// Swap a `Swappable` loan after checking the profit again at the current
    /// price. Admin-only.
    fn execute_swap(env: &Env, token_id: BytesN<32>) -> Result<SwapOutcome, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(2500), SwapDecision::NotSwappable);
        assert_eq!(classify(3199), SwapDecision::NotSwappable);
        assert_eq!(classify(3200), SwapDecision::Swappable);
        assert_eq!(classify(3215), SwapDecision::Swappable);
        assert_eq!(classify(5299), SwapDecision::Swappable);
        assert_eq!(classify(5300), SwapDecision::Swapped);
        assert_eq!(classify(-10_000), SwapDecision::NotSwappable);
    }
}
