// Application layer - validation and orchestration over the ledger store.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
