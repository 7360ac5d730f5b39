// DANS : src/state/balances.rs

use crate::decoders::spl_token_decoders::account::account_balance;
use crate::error::{Error, Result};
use crate::rpc::ChainRpc;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;

/// Soldes de tous les comptes utiles à un cycle, lus en une seule fois.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    balances: HashMap<Pubkey, u64>,
}

impl BalanceSnapshot {
    pub fn get(&self, account: &Pubkey) -> Option<u64> {
        self.balances.get(account).copied()
    }
}

/// Lit les soldes en un seul appel. Le programme propriétaire de chaque compte
/// décide entre solde SPL et lamports. Tout échec invalide le lot complet.
pub async fn read_balances(rpc: &dyn ChainRpc, accounts: &[Pubkey]) -> Result<BalanceSnapshot> {
    let fetched = rpc
        .get_multiple_accounts(accounts)
        .await
        .map_err(|e| Error::BalanceRead(format!("{e:#}")))?;
    if fetched.len() != accounts.len() {
        return Err(Error::BalanceRead(format!("{} comptes reçus pour {} demandés", fetched.len(), accounts.len())));
    }

    let mut balances = HashMap::with_capacity(accounts.len());
    for (address, account) in accounts.iter().zip(fetched) {
        let account = account.ok_or_else(|| Error::BalanceRead(format!("compte {address} introuvable")))?;
        let balance = account_balance(&account).map_err(|e| Error::BalanceRead(format!("compte {address} : {e}")))?;
        balances.insert(*address, balance);
    }
    Ok(BalanceSnapshot { balances })
}
