use serde::Serialize;

use crate::domain::{
    current_balance, normalize_identity, parse_amount, total_paid, Amount, Payment, User,
};
use crate::storage::{CsvStore, LedgerStore, SqliteStore};

use super::AppError;

/// Application service providing the user-facing ledger operations.
/// Owns no state beyond the injected store; this is the primary interface
/// for any client (CLI, API, TUI, etc.).
pub struct LedgerService {
    store: Box<dyn LedgerStore>,
}

/// Result of registering a borrower.
#[derive(Debug)]
pub struct RegisteredUser {
    pub key: String,
    pub user: User,
}

/// A user's full ledger with derived totals.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryReport {
    pub key: String,
    pub payments: Vec<Payment>,
    pub total_paid: Amount,
    /// Last parseable balance; `None` only for an externally corrupted
    /// ledger with no readable balance at all.
    pub current_balance: Option<Amount>,
}

impl LedgerService {
    /// Create a service over any ledger store.
    pub fn new(store: Box<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Open a service over the flat-file backend rooted at `records_dir`.
    pub fn open_csv(records_dir: &str) -> Result<Self, AppError> {
        let store = CsvStore::open(records_dir)?;
        Ok(Self::new(Box::new(store)))
    }

    /// Initialize a SQLite database at the given path (create + migrate).
    pub async fn init_sqlite(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = SqliteStore::init(&db_url).await?;
        Ok(Self::new(Box::new(store)))
    }

    /// Connect to an existing SQLite database.
    pub async fn connect_sqlite(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = SqliteStore::connect(&db_url).await?;
        Ok(Self::new(Box::new(store)))
    }

    /// Register a new borrower with an initial loan amount.
    ///
    /// The display name is normalized into the identity key; a name whose
    /// normalization collides with an existing key is rejected, and so is
    /// one that normalizes to nothing.
    pub async fn register_user(
        &self,
        name: &str,
        total_loan: &str,
        contact_info: &str,
    ) -> Result<RegisteredUser, AppError> {
        let name = name.trim();
        let total_loan = total_loan.trim();
        if name.is_empty() || total_loan.is_empty() {
            return Err(AppError::Validation(
                "Name and total loan amount are required".into(),
            ));
        }

        let principal = parse_amount(total_loan)
            .map_err(|_| AppError::Validation("Total loan amount must be a number".into()))?;

        let key = normalize_identity(name);
        if key.is_empty() {
            return Err(AppError::Validation(format!(
                "Name '{}' leaves nothing usable as an identity key",
                name
            )));
        }

        if self.store.exists(&key).await? {
            return Err(AppError::AlreadyExists(key));
        }

        let mut user = User::new(name.to_string(), key.clone(), principal);
        let contact_info = contact_info.trim();
        if !contact_info.is_empty() {
            user = user.with_contact_info(contact_info);
        }

        self.store.create(&user).await?;
        Ok(RegisteredUser { key, user })
    }

    /// Record a payment against a borrower's ledger and return the new
    /// remaining balance. Accepts either the identity key or the raw
    /// display name (normalized on miss).
    pub async fn record_payment(
        &self,
        user: &str,
        amount: &str,
        notes: &str,
    ) -> Result<Amount, AppError> {
        let user = user.trim();
        let amount = amount.trim();
        if user.is_empty() || amount.is_empty() {
            return Err(AppError::Validation(
                "User and payment amount are required".into(),
            ));
        }

        let value = parse_amount(amount)
            .map_err(|_| AppError::Validation("Payment amount must be a number".into()))?;

        let key = self.resolve_key(user).await?;
        Ok(self.store.append_payment(&key, value, notes.trim()).await?)
    }

    /// A user's payments in insertion order, with total paid and the
    /// current remaining balance.
    pub async fn get_history(&self, user: &str) -> Result<HistoryReport, AppError> {
        let key = self.resolve_key(user).await?;
        let payments = self.store.history(&key).await?;

        Ok(HistoryReport {
            key,
            total_paid: total_paid(&payments),
            current_balance: current_balance(&payments),
            payments,
        })
    }

    /// All known identity keys in ascending lexical order.
    pub async fn list_users(&self) -> Result<Vec<String>, AppError> {
        Ok(self.store.list_keys().await?)
    }

    /// Liveness probe.
    pub fn health(&self) -> &'static str {
        "ok"
    }

    async fn resolve_key(&self, user: &str) -> Result<String, AppError> {
        if self.store.exists(user).await? {
            return Ok(user.to_string());
        }

        let key = normalize_identity(user);
        if !key.is_empty() && key != user && self.store.exists(&key).await? {
            return Ok(key);
        }

        Err(AppError::NotFound(user.to_string()))
    }
}
