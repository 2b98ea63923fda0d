use chrono::Local;
use serde::{Deserialize, Serialize};

use super::Amount;

/// One entry in a borrower's ledger.
///
/// `amount` and `balance` are `None` when the stored text did not parse as
/// a number; such rows stay in the history but are skipped by every
/// derivation. Freshly written rows always carry both values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Calendar date as written, `%Y-%m-%d` at append time.
    pub date: String,
    pub amount: Option<Amount>,
    pub balance: Option<Amount>,
    pub note: String,
}

impl Payment {
    /// A payment dated today.
    pub fn new(amount: Amount, balance: Amount, note: impl Into<String>) -> Self {
        Self {
            date: today(),
            amount: Some(amount),
            balance: Some(balance),
            note: note.into(),
        }
    }

    /// The synthetic opening entry establishing the starting balance.
    /// Amount is zero, balance equals the principal, and the note embeds
    /// the contact info when present (the flat-file backend keeps no other
    /// record of it).
    pub fn opening(principal: Amount, contact_info: Option<&str>) -> Self {
        let note = match contact_info {
            Some(contact) if !contact.is_empty() => format!("Loan started | {}", contact),
            _ => "Loan started".to_string(),
        };
        Self::new(0.0, principal, note)
    }
}

/// Today's date in the ledger's `%Y-%m-%d` form.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
