mod csv_store;
mod sqlite;

pub use csv_store::*;
pub use sqlite::*;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Amount, Payment, User};

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Uniform contract over the two ledger backings.
///
/// Both backings expose the flat-file variant's retrieval contract: once a
/// user is created, only the identity key and the payment sequence are
/// retrievable. The relational backend persists the richer user record, but
/// nothing here reads it back.
///
/// `append_payment` is read-modify-append with no locking; callers are
/// single-writer processes, and two concurrent appends for the same key can
/// compute against the same prior balance.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Whether a ledger exists for the given identity key.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Persist a new user and the synthetic opening entry for their ledger.
    /// Callers check `exists` first; a duplicate key is a storage error here.
    async fn create(&self, user: &User) -> Result<()>;

    /// Append a payment dated today and return the new remaining balance.
    /// The balance is derived from the most recent entry (zero when that
    /// entry carries no parseable balance).
    async fn append_payment(&self, key: &str, amount: Amount, note: &str) -> Result<Amount>;

    /// All known identity keys in ascending lexical order.
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// A user's payments in insertion order; empty for an unknown key.
    async fn history(&self, key: &str) -> Result<Vec<Payment>>;
}
