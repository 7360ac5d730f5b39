pub mod instruction;
pub mod pool;

use solana_sdk::{pubkey, pubkey::Pubkey};

pub use instruction::{swap_base_in, SwapBaseIn, UserSwapAccounts};
pub use pool::{fetch_reserves, AmmPoolKeys, PoolReserves, VaultBalance};

pub const RAYDIUM_AMM_V4_PROGRAM_ID: Pubkey = pubkey!("675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8");
pub const SERUM_PROGRAM_ID_V3: Pubkey = pubkey!("9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin");
