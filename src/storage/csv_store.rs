use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use crate::domain::{format_amount, next_balance, parse_amount, prev_balance, Amount, Payment, User};

use super::LedgerStore;

/// Column schema shared by the per-user ledger files and the CSV export.
pub const CSV_HEADERS: [&str; 4] = ["Date", "Payment_Amount", "Remaining_Balance", "Notes"];

/// Flat-file ledger backing: one `<key>.csv` per user in a records
/// directory. File presence is the existence signal, and the opening
/// entry's balance is the only persisted record of the principal.
pub struct CsvStore {
    records_dir: PathBuf,
}

impl CsvStore {
    /// Open a store rooted at the given directory, creating it if needed.
    pub fn open(records_dir: impl Into<PathBuf>) -> Result<Self> {
        let records_dir = records_dir.into();
        fs::create_dir_all(&records_dir).with_context(|| {
            format!("Failed to create records directory: {}", records_dir.display())
        })?;
        Ok(Self { records_dir })
    }

    fn user_filepath(&self, key: &str) -> PathBuf {
        self.records_dir.join(format!("{}.csv", key))
    }

    fn read_records(&self, key: &str) -> Result<Vec<Payment>> {
        let path = self.user_filepath(key);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("Failed to open ledger file: {}", path.display()))?;

        let mut payments = Vec::new();
        for record in reader.records() {
            let record = record.context("Failed to read ledger row")?;
            payments.push(row_to_payment(&record));
        }
        Ok(payments)
    }

    fn write_row(&self, key: &str, payment: &Payment) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(self.user_filepath(key))
            .with_context(|| format!("Failed to open ledger file for append: {}", key))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(payment_record(payment))?;
        writer.flush().context("Failed to flush ledger row")?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for CsvStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.user_filepath(key).exists())
    }

    async fn create(&self, user: &User) -> Result<()> {
        let path = self.user_filepath(&user.username);
        if path.exists() {
            bail!("Ledger file already exists: {}", path.display());
        }

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create ledger file: {}", path.display()))?;
        writer.write_record(CSV_HEADERS)?;

        let opening = Payment::opening(user.total_loan, user.contact_info.as_deref());
        writer.write_record(payment_record(&opening))?;
        writer.flush().context("Failed to flush new ledger file")?;
        Ok(())
    }

    async fn append_payment(&self, key: &str, amount: Amount, note: &str) -> Result<Amount> {
        if !self.user_filepath(key).exists() {
            bail!("No ledger file for user: {}", key);
        }

        let records = self.read_records(key)?;
        let balance = next_balance(prev_balance(&records), amount);
        self.write_row(key, &Payment::new(amount, balance, note))?;
        Ok(balance)
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let entries = fs::read_dir(&self.records_dir).with_context(|| {
            format!("Failed to read records directory: {}", self.records_dir.display())
        })?;

        for entry in entries {
            let path = entry.context("Failed to read directory entry")?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn history(&self, key: &str) -> Result<Vec<Payment>> {
        self.read_records(key)
    }
}

fn row_to_payment(record: &csv::StringRecord) -> Payment {
    Payment {
        date: record.get(0).unwrap_or("").to_string(),
        amount: parse_amount(record.get(1).unwrap_or("")).ok(),
        balance: parse_amount(record.get(2).unwrap_or("")).ok(),
        note: record.get(3).unwrap_or("").to_string(),
    }
}

fn payment_record(payment: &Payment) -> [String; 4] {
    [
        payment.date.clone(),
        payment.amount.map(format_amount).unwrap_or_default(),
        payment.balance.map(format_amount).unwrap_or_default(),
        payment.note.clone(),
    ]
}
