use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::LedgerService;
use crate::domain::{format_amount, normalize_identity};
use crate::io::Exporter;

/// Prestito - Loan Tracking Ledger
#[derive(Parser)]
#[command(name = "prestito")]
#[command(about = "A local-first ledger for tracking loans and repayments")]
#[command(version)]
pub struct Cli {
    /// Storage backend: csv (one file per borrower) or sqlite
    #[arg(short, long, value_enum, default_value_t = StoreKind::Csv)]
    pub store: StoreKind,

    /// Records directory (csv backend)
    #[arg(long, default_value = "records")]
    pub records_dir: String,

    /// Database file path (sqlite backend)
    #[arg(short, long, default_value = "prestito.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Csv,
    Sqlite,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the storage backend
    Init,

    /// Register a new borrower with an initial loan amount
    Add {
        /// Borrower's display name
        name: String,

        /// Total loan amount (e.g., "250.00" or "250")
        amount: String,

        /// Contact info (phone, email, ...)
        #[arg(short, long)]
        contact: Option<String>,
    },

    /// Record a payment against a borrower's ledger
    Pay {
        /// Borrower (identity key or display name)
        user: String,

        /// Payment amount (e.g., "20.00" or "20")
        amount: String,

        /// Free-text note for this payment
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all known borrowers
    Users,

    /// Show a borrower's payment history with totals
    History {
        /// Borrower (identity key or display name)
        user: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Export a borrower's ledger as CSV
    Export {
        /// Borrower (identity key or display name)
        user: String,

        /// Output file (defaults to <key>.csv)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Verify the store is reachable
    Check,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if matches!(self.command, Commands::Init) {
            match self.store {
                StoreKind::Sqlite => {
                    LedgerService::init_sqlite(&self.database).await?;
                    println!("Database initialized: {}", self.database);
                }
                StoreKind::Csv => {
                    LedgerService::open_csv(&self.records_dir)?;
                    println!("Records directory ready: {}", self.records_dir);
                }
            }
            return Ok(());
        }

        let service = self.open_service().await?;

        match self.command {
            Commands::Init => unreachable!("handled above"),

            Commands::Add {
                name,
                amount,
                contact,
            } => {
                let registered = service
                    .register_user(&name, &amount, contact.as_deref().unwrap_or(""))
                    .await?;
                println!(
                    "Created user \"{}\" with loan {} (key: {})",
                    registered.user.name,
                    format_amount(registered.user.total_loan),
                    registered.key
                );
            }

            Commands::Pay {
                user,
                amount,
                notes,
            } => {
                let balance = service
                    .record_payment(&user, &amount, notes.as_deref().unwrap_or(""))
                    .await?;
                println!(
                    "Payment added successfully. New remaining balance: {}",
                    format_amount(balance)
                );
            }

            Commands::Users => {
                let users = service.list_users().await?;
                if users.is_empty() {
                    println!("No users found.");
                } else {
                    for key in users {
                        println!("{}", key);
                    }
                }
            }

            Commands::History { user, format } => {
                run_history_command(&service, &user, &format).await?;
            }

            Commands::Export { user, output } => {
                run_export_command(&service, &user, output.as_deref(), self.verbose).await?;
            }

            Commands::Check => {
                let count = service.list_users().await?.len();
                println!("{} ({} users)", service.health(), count);
            }
        }

        Ok(())
    }

    async fn open_service(&self) -> Result<LedgerService> {
        if self.verbose {
            match self.store {
                StoreKind::Csv => eprintln!("[store] csv records in {}", self.records_dir),
                StoreKind::Sqlite => eprintln!("[store] sqlite database {}", self.database),
            }
        }

        let service = match self.store {
            StoreKind::Csv => LedgerService::open_csv(&self.records_dir)?,
            StoreKind::Sqlite => LedgerService::connect_sqlite(&self.database)
                .await
                .context("Failed to open database. Run `prestito --store sqlite init` first")?,
        };
        Ok(service)
    }
}

async fn run_history_command(service: &LedgerService, user: &str, format: &str) -> Result<()> {
    use std::io::stdout;

    match format {
        "json" => {
            Exporter::new(service)
                .export_history_json(user, stdout())
                .await?;
        }
        "csv" => {
            Exporter::new(service)
                .export_history_csv(user, stdout())
                .await?;
        }
        _ => {
            let report = service.get_history(user).await?;

            println!("History for {}", report.key);
            println!();
            println!("{:<12} {:>12} {:>12}  {}", "DATE", "PAYMENT", "BALANCE", "NOTES");
            println!("{}", "-".repeat(60));

            for payment in &report.payments {
                println!(
                    "{:<12} {:>12} {:>12}  {}",
                    payment.date,
                    payment.amount.map(format_amount).unwrap_or_else(|| "-".into()),
                    payment.balance.map(format_amount).unwrap_or_else(|| "-".into()),
                    payment.note
                );
            }

            println!("{}", "-".repeat(60));
            println!("{:<12} {:>12}", "Total paid", format_amount(report.total_paid));
            match report.current_balance {
                Some(balance) => {
                    println!("{:<12} {:>12}", "Remaining", format_amount(balance));
                }
                None => println!("{:<12} {:>12}", "Remaining", "-"),
            }
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    user: &str,
    output: Option<&str>,
    verbose: bool,
) -> Result<()> {
    // The download has always been named after the identity key; keys are
    // fixed points of normalization, so this works for raw names too.
    let path = match output {
        Some(path) => path.to_string(),
        None => format!("{}.csv", normalize_identity(user)),
    };

    // Render first so an unknown user leaves no stray file behind.
    let mut buf = Vec::new();
    let count = Exporter::new(service).export_history_csv(user, &mut buf).await?;
    std::fs::write(&path, &buf)
        .with_context(|| format!("Failed to create output file: {}", path))?;

    println!("Exported {} to {}", user, path);
    if verbose {
        eprintln!("[export] {} payment rows", count);
    }
    Ok(())
}
