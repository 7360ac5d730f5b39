// DANS: src/decoders/raydium/amm_v4/pool.rs

use crate::decoders::spl_token_decoders::account::decode_account;
use crate::error::{Error, Result};
use crate::registry::pubkey_string;
use crate::rpc::ChainRpc;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Les comptes statiques nécessaires pour adresser un pool Raydium AMM v4
/// et son marché Serum/OpenBook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmmPoolKeys {
    #[serde(with = "pubkey_string")] pub amm_id: Pubkey,
    #[serde(with = "pubkey_string")] pub amm_authority: Pubkey,
    #[serde(with = "pubkey_string")] pub open_orders: Pubkey,
    #[serde(with = "pubkey_string")] pub target_orders: Pubkey,
    #[serde(with = "pubkey_string")] pub coin_vault: Pubkey,
    #[serde(with = "pubkey_string")] pub pc_vault: Pubkey,
    #[serde(with = "pubkey_string")] pub market_program_id: Pubkey,
    #[serde(with = "pubkey_string")] pub market: Pubkey,
    #[serde(with = "pubkey_string")] pub market_bids: Pubkey,
    #[serde(with = "pubkey_string")] pub market_asks: Pubkey,
    #[serde(with = "pubkey_string")] pub market_event_queue: Pubkey,
    #[serde(with = "pubkey_string")] pub market_coin_vault: Pubkey,
    #[serde(with = "pubkey_string")] pub market_pc_vault: Pubkey,
    #[serde(with = "pubkey_string")] pub market_vault_signer: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultBalance {
    pub mint: Pubkey,
    pub amount: u64,
}

/// Réserves courantes des deux vaults du pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolReserves {
    pub coin: VaultBalance,
    pub pc: VaultBalance,
}

impl PoolReserves {
    /// Retourne `(reserve_in, reserve_out)` pour un swap dont l'entrée est `input_mint`.
    /// Le sens est déterminé par le mint réel des vaults, pas par la configuration.
    pub fn oriented(&self, input_mint: &Pubkey) -> Result<(u64, u64)> {
        if *input_mint == self.coin.mint {
            Ok((self.coin.amount, self.pc.amount))
        } else if *input_mint == self.pc.mint {
            Ok((self.pc.amount, self.coin.amount))
        } else {
            Err(Error::PoolState(format!(
                "le mint {} n'appartient pas au pool ({} / {})",
                input_mint, self.coin.mint, self.pc.mint
            )))
        }
    }
}

/// Lit les deux vaults du pool en un seul appel `getMultipleAccounts`.
pub async fn fetch_reserves(rpc: &dyn ChainRpc, keys: &AmmPoolKeys) -> Result<PoolReserves> {
    let mut accounts = rpc
        .get_multiple_accounts(&[keys.coin_vault, keys.pc_vault])
        .await
        .map_err(|e| Error::PoolState(format!("{e:#}")))?;
    if accounts.len() != 2 {
        return Err(Error::PoolState(format!("{} comptes reçus au lieu de 2", accounts.len())));
    }

    let coin_account = accounts[0]
        .take()
        .ok_or_else(|| Error::PoolState(format!("vault coin {} non trouvé", keys.coin_vault)))?;
    let pc_account = accounts[1]
        .take()
        .ok_or_else(|| Error::PoolState(format!("vault pc {} non trouvé", keys.pc_vault)))?;

    let coin = decode_account(&coin_account.data).map_err(|e| Error::PoolState(format!("vault coin : {e}")))?;
    let pc = decode_account(&pc_account.data).map_err(|e| Error::PoolState(format!("vault pc : {e}")))?;

    Ok(PoolReserves {
        coin: VaultBalance { mint: coin.mint, amount: coin.amount },
        pc: VaultBalance { mint: pc.mint, amount: pc.amount },
    })
}
