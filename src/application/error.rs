use thiserror::Error;

/// Errors surfaced by the ledger service. All are recoverable by retrying
/// with corrected input; the first three variants leave the store
/// untouched.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Store(#[from] anyhow::Error),
}
