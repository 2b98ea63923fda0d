use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::domain::{next_balance, Amount, Payment, User};

use super::{LedgerStore, MIGRATION_001_INITIAL};

/// Relational ledger backing over SQLite.
///
/// Unlike the flat-file store, the user record is persisted with
/// first-class columns, but the `LedgerStore` contract stays the same:
/// nothing reads them back after creation.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    async fn user_id(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT id FROM users WHERE username = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        Ok(row.map(|r| r.get("id")))
    }

    async fn last_balance(&self, user_id: &str) -> Result<Amount> {
        let row = sqlx::query(
            r#"
            SELECT remaining_balance
            FROM payments
            WHERE user_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch last balance")?;

        Ok(row.map(|r| r.get("remaining_balance")).unwrap_or(0.0))
    }

    async fn insert_payment(&self, user_id: &str, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (user_id, date, payment_amount, remaining_balance, notes)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&payment.date)
        .bind(payment.amount)
        .bind(payment.balance)
        .bind(&payment.note)
        .execute(&self.pool)
        .await
        .context("Failed to save payment")?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for SqliteStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.user_id(key).await?.is_some())
    }

    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, username, total_loan, contact_info, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.username)
        .bind(user.total_loan)
        .bind(&user.contact_info)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save user")?;

        let opening = Payment::opening(user.total_loan, user.contact_info.as_deref());
        self.insert_payment(&user.id.to_string(), &opening).await
    }

    async fn append_payment(&self, key: &str, amount: Amount, note: &str) -> Result<Amount> {
        let user_id = match self.user_id(key).await? {
            Some(id) => id,
            None => bail!("No such user: {}", key),
        };

        let balance = next_balance(self.last_balance(&user_id).await?, amount);
        let payment = Payment::new(amount, balance, note);
        self.insert_payment(&user_id, &payment).await?;
        Ok(balance)
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT username FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users")?;

        Ok(rows.iter().map(|r| r.get("username")).collect())
    }

    async fn history(&self, key: &str) -> Result<Vec<Payment>> {
        let user_id = match self.user_id(key).await? {
            Some(id) => id,
            None => return Ok(Vec::new()),
        };

        let rows = sqlx::query(
            r#"
            SELECT date, payment_amount, remaining_balance, notes
            FROM payments
            WHERE user_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch payments")?;

        Ok(rows.iter().map(row_to_payment).collect())
    }
}

fn row_to_payment(row: &sqlx::sqlite::SqliteRow) -> Payment {
    let notes: Option<String> = row.get("notes");
    Payment {
        date: row.get("date"),
        amount: Some(row.get("payment_amount")),
        balance: Some(row.get("remaining_balance")),
        note: notes.unwrap_or_default(),
    }
}
