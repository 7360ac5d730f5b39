use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    account::Account,
    commitment_config::{CommitmentConfig, CommitmentLevel},
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::warn;

use super::{ChainRpc, SignatureState};

/// Un "wrapper" autour du RpcClient de Solana qui ré-essaie automatiquement
/// les lectures qui échouent à cause d'erreurs réseau temporaires.
/// L'envoi d'une transaction n'est jamais ré-essayé ici.
#[derive(Clone)]
pub struct ResilientRpcClient {
    client: Arc<RpcClient>,
    max_retries: u8,
    delay_ms: u64,
    skip_preflight: bool,
}

impl ResilientRpcClient {
    pub fn new(rpc_url: String, max_retries: u8, delay_ms: u64) -> Self {
        Self {
            client: Arc::new(RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed())),
            max_retries,
            delay_ms,
            skip_preflight: false,
        }
    }

    /// Envoi sans simulation préalable (comportement historique du bot).
    pub fn with_skip_preflight(mut self, skip_preflight: bool) -> Self {
        self.skip_preflight = skip_preflight;
        self
    }

    /// Détermine si une erreur du client est temporaire et si une nouvelle tentative doit être effectuée.
    fn is_retryable(error: &ClientError) -> bool {
        matches!(
            error.kind(),
            ClientErrorKind::Reqwest(_) | ClientErrorKind::RpcError(_) | ClientErrorKind::Io(_)
        )
    }

    async fn with_retry<T, F, Fut>(&self, method: &'static str, call: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, ClientError>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if Self::is_retryable(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(method, attempt, error = %e, "Erreur RPC temporaire, nouvelle tentative.");
                    sleep(Duration::from_millis(self.delay_ms)).await;
                }
                Err(e) => return Err(e).with_context(|| format!("Échec final de {method}")),
            }
        }
    }
}

#[async_trait]
impl ChainRpc for ResilientRpcClient {
    async fn get_multiple_accounts(&self, pubkeys: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        self.with_retry("get_multiple_accounts", || self.client.get_multiple_accounts(pubkeys))
            .await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash> {
        self.with_retry("get_latest_blockhash", || self.client.get_latest_blockhash())
            .await
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        self.with_retry("get_minimum_balance_for_rent_exemption", || {
            self.client.get_minimum_balance_for_rent_exemption(data_len)
        })
        .await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: self.skip_preflight,
            preflight_commitment: Some(CommitmentLevel::Confirmed),
            ..RpcSendTransactionConfig::default()
        };
        self.client
            .send_transaction_with_config(transaction, config)
            .await
            .context("Échec de send_transaction")
    }

    async fn get_signature_state(&self, signature: &Signature) -> Result<SignatureState> {
        let signatures = [*signature];
        let response = self
            .with_retry("get_signature_statuses", || self.client.get_signature_statuses(&signatures))
            .await?;
        let state = match response.value.into_iter().next().flatten() {
            None => SignatureState::Pending,
            Some(status) => match status.err {
                Some(err) => SignatureState::Failed(err.to_string()),
                None if status.satisfies_commitment(CommitmentConfig::confirmed()) => SignatureState::Confirmed,
                None => SignatureState::Pending,
            },
        };
        Ok(state)
    }
}
