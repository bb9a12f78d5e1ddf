pub mod health;
pub mod transfer;
pub mod wallet;

pub use health::health_check;
pub use transfer::{list_banks, transfer, verify_bank};
pub use wallet::{fund, get_balance, list_transactions, resolve_wallet, verify_payment, webhook};
