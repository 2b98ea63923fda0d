// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use prestito::application::LedgerService;
use tempfile::TempDir;

/// Helper to create a test service over a temporary SQLite database
pub async fn sqlite_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init_sqlite(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a test service over a temporary records directory
pub fn csv_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let records_dir = temp_dir.path().join("records");
    let service = LedgerService::open_csv(records_dir.to_str().unwrap())?;
    Ok((service, temp_dir))
}

/// Both backends, for parity tests
pub async fn all_services() -> Result<Vec<(LedgerService, TempDir)>> {
    let (sqlite, sqlite_dir) = sqlite_service().await?;
    let (csv, csv_dir) = csv_service()?;
    Ok(vec![(sqlite, sqlite_dir), (csv, csv_dir)])
}
