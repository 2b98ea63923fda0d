use super::{Amount, Payment};

/// Compute the balance left after applying a payment.
/// Balances are not clamped: overpaying simply goes negative.
pub fn next_balance(prev_balance: Amount, payment_amount: Amount) -> Amount {
    prev_balance - payment_amount
}

/// The balance a new payment is computed against: the most recent entry's
/// balance. A missing or unparsable last balance counts as zero.
pub fn prev_balance(payments: &[Payment]) -> Amount {
    payments.last().and_then(|p| p.balance).unwrap_or(0.0)
}

/// Sum of every parseable payment amount. Malformed entries are skipped,
/// never fatal.
pub fn total_paid(payments: &[Payment]) -> Amount {
    payments.iter().filter_map(|p| p.amount).sum()
}

/// The most recent parseable balance, or `None` when no entry carries one.
pub fn current_balance(payments: &[Payment]) -> Option<Amount> {
    payments.iter().rev().find_map(|p| p.balance)
}
