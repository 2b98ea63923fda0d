mod amount;
mod identity;
mod ledger;
mod payment;
mod user;

pub use amount::*;
pub use identity::*;
pub use ledger::*;
pub use payment::*;
pub use user::*;
