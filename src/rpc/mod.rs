// src/rpc/mod.rs

pub mod resilient_client;

#[cfg(test)]
pub mod mock;

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::{
    account::Account, hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};

pub use resilient_client::ResilientRpcClient;

/// Statut d'une transaction envoyée, tel que vu par le réseau.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureState {
    Pending,
    Confirmed,
    Failed(String),
}

/// La frontière réseau du moteur : tout ce que le bot demande au nœud RPC.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn get_multiple_accounts(&self, pubkeys: &[Pubkey]) -> Result<Vec<Option<Account>>>;

    async fn get_latest_blockhash(&self) -> Result<Hash>;

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64>;

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature>;

    async fn get_signature_state(&self, signature: &Signature) -> Result<SignatureState>;
}
