use super::{pubkey_string, NATIVE_SOL};
use crate::decoders::raydium::amm_v4::{AmmPoolKeys, SERUM_PROGRAM_ID_V3};
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey, pubkey::Pubkey};
use std::collections::BTreeMap;

/// Une paire échangeable : le sens "achat" va de `from_mint` vers `to_mint`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(with = "pubkey_string")]
    pub from_mint: Pubkey,
    #[serde(with = "pubkey_string")]
    pub to_mint: Pubkey,
    pub raydium: AmmPoolKeys,
}

pub fn builtin_pools() -> BTreeMap<String, PoolConfig> {
    let mut pools = BTreeMap::new();
    pools.insert(
        "from_sol_to_prt_raydium".to_string(),
        PoolConfig {
            from_mint: NATIVE_SOL,
            to_mint: pubkey!("PRT88RkA4Kg5z7pKnezeNH4mafTvtQdfFgpQTGRjz44"),
            raydium: AmmPoolKeys {
                amm_id: pubkey!("7rVAbPFzqaBmydukTDFAuBiuyBrTVhpa5LpfDRrjX9mr"),
                amm_authority: pubkey!("5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1"),
                open_orders: pubkey!("7nsGyAGAawvpVF2JQRKLJ9PVwE64Xc2CzhbTukJdZ4TY"),
                target_orders: pubkey!("DqR8zK676oafdCMAtRm6Jc5d8ADQtoiUKnQb6DkTnisE"),
                coin_vault: pubkey!("Bh8KFmkkXZQzNgQ9qpjegfWQjNupLugtoNDZSacawGbb"),
                pc_vault: pubkey!("ArBXA3NvfSmSDq4hhR17qyKpwkKvGvgnBiZC4K36eMvz"),
                market_program_id: SERUM_PROGRAM_ID_V3,
                market: pubkey!("H7ZmXKqEx1T8CTM4EMyqR5zyz4e4vUpWTTbCmYmzxmeW"),
                market_bids: pubkey!("5Yfr8HHzV8FHWBiCDCh5U7bUNbnaUL4UKMGasaveAXQo"),
                market_asks: pubkey!("A2gckowJzAv3P2fuYtMTQbEvVCpKZa6EbjwRsBzzeLQj"),
                market_event_queue: pubkey!("2hYscTLaWWWELYNsHmYqK9XK8TnbGF2fn2cSqAvVrwrd"),
                market_coin_vault: pubkey!("4Zm3aQqQHJFb7Q4oQotfxUFBcf9FVP6qvt2pkJA35Ymn"),
                market_pc_vault: pubkey!("B34rGhNUNxnSfxodkUoqYC3kGMdF4BjFHV2rQZAzQPMF"),
                market_vault_signer: pubkey!("9ZGDGCN9BHiqEy44JAd1ExaAiRoh9HWou8nw44MbhnNX"),
            },
        },
    );
    pools
}
