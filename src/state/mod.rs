// DANS : src/state/mod.rs

pub mod accounts;
pub mod balances;
pub mod execution_log;
pub mod json_store;

pub use accounts::{ensure_accounts, holding_account, HoldingAccounts};
pub use balances::{read_balances, BalanceSnapshot};
pub use execution_log::{ExecutionLog, OutcomeStatus, SwapOutcome};
