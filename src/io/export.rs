use anyhow::Result;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::format_amount;
use crate::storage::CSV_HEADERS;

/// Exporter for rendering a borrower's ledger to downloadable formats.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export a user's ledger as CSV.
    ///
    /// The column order (`Date,Payment_Amount,Remaining_Balance,Notes`) is
    /// fixed; downstream consumers parse it positionally. Returns the
    /// number of payment rows written.
    pub async fn export_history_csv<W: Write>(&self, user: &str, writer: W) -> Result<usize> {
        let report = self.service.get_history(user).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(CSV_HEADERS)?;

        let mut count = 0;
        for payment in &report.payments {
            csv_writer.write_record([
                payment.date.clone(),
                payment.amount.map(format_amount).unwrap_or_default(),
                payment.balance.map(format_amount).unwrap_or_default(),
                payment.note.clone(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export a user's ledger with derived totals as pretty JSON.
    pub async fn export_history_json<W: Write>(&self, user: &str, mut writer: W) -> Result<usize> {
        let report = self.service.get_history(user).await?;
        let count = report.payments.len();

        let json = serde_json::to_string_pretty(&report)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(count)
    }
}
