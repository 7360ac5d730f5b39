// DANS : src/state/accounts.rs

use crate::error::{Error, Result};
use crate::execution::TransactionExecutor;
use crate::registry::is_native;
use crate::rpc::ChainRpc;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer};
use spl_associated_token_account::{get_associated_token_address, instruction::create_associated_token_account};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// mint → compte de détention du propriétaire.
pub type HoldingAccounts = BTreeMap<Pubkey, Pubkey>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAccounts {
    pub existing: HoldingAccounts,
    pub missing: HoldingAccounts,
}

/// Seule source de vérité pour le compte de détention d'un actif :
/// le portefeuille lui-même pour le SOL natif, l'ATA sinon.
pub fn holding_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    if is_native(mint) { *owner } else { get_associated_token_address(owner, mint) }
}

/// Classe les comptes de détention en existants / manquants avec un seul
/// appel `getMultipleAccounts`. Les doublons sont résolus une seule fois.
pub async fn resolve(rpc: &dyn ChainRpc, owner: &Pubkey, mints: &[Pubkey]) -> Result<ResolvedAccounts> {
    let mut resolved = ResolvedAccounts::default();
    let unique: BTreeSet<Pubkey> = mints.iter().copied().collect();

    let mut to_check = Vec::new();
    for mint in unique {
        if is_native(&mint) {
            resolved.existing.insert(mint, *owner);
        } else {
            to_check.push((mint, holding_account(owner, &mint)));
        }
    }
    if to_check.is_empty() {
        return Ok(resolved);
    }

    let addresses: Vec<Pubkey> = to_check.iter().map(|(_, address)| *address).collect();
    let accounts = rpc
        .get_multiple_accounts(&addresses)
        .await
        .map_err(|e| Error::Resolution(format!("{e:#}")))?;
    if accounts.len() != addresses.len() {
        return Err(Error::Resolution(format!("{} comptes reçus pour {} demandés", accounts.len(), addresses.len())));
    }

    for ((mint, address), account) in to_check.into_iter().zip(accounts) {
        match account {
            None => {
                resolved.missing.insert(mint, address);
            }
            Some(account) if account.owner != spl_token::id() => {
                return Err(Error::Resolution(format!(
                    "le compte {address} du mint {mint} n'appartient pas au programme SPL Token"
                )));
            }
            Some(_) => {
                resolved.existing.insert(mint, address);
            }
        }
    }
    Ok(resolved)
}

/// Une instruction de création d'ATA par mint manquant (le SOL natif n'en a jamais besoin).
pub fn creation_instructions(payer: &Pubkey, owner: &Pubkey, missing: &HoldingAccounts) -> Vec<Instruction> {
    missing
        .keys()
        .filter(|mint| !is_native(mint))
        .map(|mint| create_associated_token_account(payer, owner, mint, &spl_token::id()))
        .collect()
}

/// Résout puis crée les comptes manquants dans une seule transaction.
/// Un échec de cette transaction fait échouer toute l'initialisation.
pub async fn ensure_accounts(
    rpc: &dyn ChainRpc,
    executor: &TransactionExecutor,
    payer: &Keypair,
    mints: &[Pubkey],
) -> Result<HoldingAccounts> {
    let owner = payer.pubkey();
    let ResolvedAccounts { mut existing, missing } = resolve(rpc, &owner, mints).await?;
    if missing.is_empty() {
        return Ok(existing);
    }

    for mint in missing.keys() {
        info!(%mint, "Compte de jetons manquant, création.");
    }
    let instructions = creation_instructions(&owner, &owner, &missing);
    let signature = executor
        .execute(&instructions, &[payer])
        .await
        .map_err(|e| Error::AccountCreation(e.to_string()))?;
    info!(%signature, created = missing.len(), "Comptes de jetons manquants créés.");

    existing.extend(missing);
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NATIVE_SOL;
    use crate::rpc::{mock::MockRpc, SignatureState};
    use std::sync::Arc;

    #[tokio::test]
    async fn classifies_existing_and_missing_accounts() {
        let rpc = MockRpc::new();
        let owner = Pubkey::new_unique();
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let ata_a = holding_account(&owner, &a);
        rpc.set_token_account(ata_a, a, owner, 0);

        let resolved = resolve(&rpc, &owner, &[a, b, a]).await.unwrap();
        assert_eq!(resolved.existing.get(&a), Some(&ata_a));
        assert_eq!(resolved.missing.get(&b), Some(&holding_account(&owner, &b)));
        assert_eq!(resolved.existing.len(), 1);
        assert_eq!(resolved.missing.len(), 1);
        assert_eq!(rpc.read_calls(), 1);

        let ixs = creation_instructions(&owner, &owner, &resolved.missing);
        assert_eq!(ixs.len(), 1);
        assert_eq!(ixs[0].program_id, spl_associated_token_account::id());
        assert_eq!(ixs[0].accounts[1].pubkey, holding_account(&owner, &b));
    }

    #[tokio::test]
    async fn native_sol_is_the_owner_and_never_queried() {
        let rpc = MockRpc::new();
        let owner = Pubkey::new_unique();
        let resolved = resolve(&rpc, &owner, &[NATIVE_SOL]).await.unwrap();
        assert_eq!(resolved.existing.get(&NATIVE_SOL), Some(&owner));
        assert!(resolved.missing.is_empty());
        assert_eq!(rpc.read_calls(), 0);
    }

    #[tokio::test]
    async fn lookup_failure_is_a_resolution_error() {
        let rpc = MockRpc::new();
        rpc.fail_reads(true);
        let err = resolve(&rpc, &Pubkey::new_unique(), &[Pubkey::new_unique()]).await.unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }

    #[tokio::test]
    async fn ensure_accounts_creates_all_missing_in_one_transaction() {
        let rpc = Arc::new(MockRpc::new());
        let executor = TransactionExecutor::new(rpc.clone(), None);
        let payer = Keypair::new();
        let (a, b, c) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
        rpc.set_token_account(holding_account(&payer.pubkey(), &a), a, payer.pubkey(), 10);

        let accounts = ensure_accounts(rpc.as_ref(), &executor, &payer, &[a, b, c, NATIVE_SOL]).await.unwrap();
        assert_eq!(accounts.len(), 4);
        assert_eq!(accounts[&NATIVE_SOL], payer.pubkey());

        let sent = rpc.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message.instructions.len(), 2);
    }

    #[tokio::test]
    async fn failed_creation_aborts_initialization() {
        let rpc = Arc::new(MockRpc::new());
        rpc.set_signature_state(SignatureState::Failed("InsufficientFundsForRent".to_string()));
        let executor = TransactionExecutor::new(rpc.clone(), Some(crate::execution::ConfirmationPolicy::new(std::time::Duration::from_secs(1))));
        let payer = Keypair::new();

        let err = ensure_accounts(rpc.as_ref(), &executor, &payer, &[Pubkey::new_unique()]).await.unwrap_err();
        assert!(matches!(err, Error::AccountCreation(_)));
    }
}
