use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Amount;

pub type UserId = Uuid;

/// A borrower's identity record.
///
/// `username` is the normalized identity key and is immutable once the
/// user is created. The relational backend persists every field; the
/// flat-file backend keeps only the ledger, so `name` and `contact_info`
/// survive there solely inside the opening entry's note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub total_loan: Amount,
    pub contact_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, username: String, total_loan: Amount) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            username,
            total_loan,
            contact_info: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_contact_info(mut self, contact_info: impl Into<String>) -> Self {
        self.contact_info = Some(contact_info.into());
        self
    }
}
