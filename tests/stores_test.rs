mod common;

use anyhow::Result;
use common::{csv_service, sqlite_service};
use prestito::application::LedgerService;
use prestito::storage::{CsvStore, LedgerStore};
use tempfile::TempDir;

/// Both backends must be indistinguishable through the service.
#[tokio::test]
async fn test_backend_parity() -> Result<()> {
    let (sqlite, _t1) = sqlite_service().await?;
    let (csv, _t2) = csv_service()?;

    for service in [&sqlite, &csv] {
        service.register_user("Zeta", "200", "z@example.com").await?;
        service.register_user("John Doe", "100", "").await?;
        service.record_payment("john_doe", "20", "cash").await?;
        service.record_payment("zeta", "50.5", "").await?;
    }

    assert_eq!(sqlite.list_users().await?, csv.list_users().await?);
    for key in ["john_doe", "zeta"] {
        let a = sqlite.get_history(key).await?;
        let b = csv.get_history(key).await?;
        assert_eq!(a.payments, b.payments);
        assert_eq!(a.total_paid, b.total_paid);
        assert_eq!(a.current_balance, b.current_balance);
    }
    Ok(())
}

fn store_with_ledger(rows: &str) -> Result<(CsvStore, TempDir)> {
    let temp = TempDir::new()?;
    let store = CsvStore::open(temp.path().to_str().unwrap())?;
    std::fs::write(
        temp.path().join("john_doe.csv"),
        format!("Date,Payment_Amount,Remaining_Balance,Notes\n{rows}"),
    )?;
    Ok((store, temp))
}

#[tokio::test]
async fn test_malformed_amount_skipped_in_totals() -> Result<()> {
    let (store, temp) = store_with_ledger(
        "2024-01-01,0.0,100.0,Loan started\n\
         2024-01-02,oops,90.0,smudged row\n\
         2024-01-03,20.0,70.0,\n",
    )?;

    let service = LedgerService::new(Box::new(store));
    let report = service.get_history("john_doe").await?;
    assert_eq!(report.payments.len(), 3);
    assert_eq!(report.total_paid, 20.0);
    assert_eq!(report.current_balance, Some(70.0));

    drop(temp);
    Ok(())
}

#[tokio::test]
async fn test_malformed_last_balance_treated_as_zero_on_append() -> Result<()> {
    let (store, temp) = store_with_ledger(
        "2024-01-01,0.0,100.0,Loan started\n\
         2024-01-02,10.0,not-a-number,\n",
    )?;

    let balance = store.append_payment("john_doe", 20.0, "").await?;
    assert_eq!(balance, -20.0);

    drop(temp);
    Ok(())
}

#[tokio::test]
async fn test_unknown_key_has_empty_history_at_store_level() -> Result<()> {
    let temp = TempDir::new()?;
    let store = CsvStore::open(temp.path().to_str().unwrap())?;

    assert!(!store.exists("ghost").await?);
    assert!(store.history("ghost").await?.is_empty());
    assert!(store.append_payment("ghost", 10.0, "").await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_list_keys_ignores_foreign_files() -> Result<()> {
    let temp = TempDir::new()?;
    let store = CsvStore::open(temp.path().to_str().unwrap())?;
    std::fs::write(temp.path().join("notes.txt"), "not a ledger")?;
    std::fs::write(
        temp.path().join("abe.csv"),
        "Date,Payment_Amount,Remaining_Balance,Notes\n",
    )?;

    assert_eq!(store.list_keys().await?, vec!["abe"]);
    Ok(())
}
