// DANS : src/execution/sender.rs

use crate::error::{Error, Result};
use crate::rpc::{ChainRpc, SignatureState};
use solana_sdk::{
    instruction::Instruction,
    message::Message,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::{sync::Arc, time::Duration};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Attente de la confirmation réseau après l'envoi.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ConfirmationPolicy {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, poll_interval: DEFAULT_POLL_INTERVAL }
    }
}

/// Assemble, signe, envoie et (optionnellement) confirme une transaction.
/// Aucun ré-essai d'envoi ici : c'est le cycle suivant qui retente.
#[derive(Clone)]
pub struct TransactionExecutor {
    rpc: Arc<dyn ChainRpc>,
    confirmation: Option<ConfirmationPolicy>,
}

impl TransactionExecutor {
    pub fn new(rpc: Arc<dyn ChainRpc>, confirmation: Option<ConfirmationPolicy>) -> Self {
        Self { rpc, confirmation }
    }

    /// `true` si `execute` ne rend la main qu'une fois la transaction confirmée.
    pub fn confirms(&self) -> bool {
        self.confirmation.is_some()
    }

    /// Le premier signataire paie les frais. Chaque signataire exigé par le
    /// message doit être fourni, et seuls ceux-là signent.
    pub async fn execute(&self, instructions: &[Instruction], signers: &[&Keypair]) -> Result<Signature> {
        let payer = signers
            .first()
            .ok_or_else(|| Error::Build("aucun signataire fourni".to_string()))?;
        let message = Message::new(instructions, Some(&payer.pubkey()));

        let required = message.header.num_required_signatures as usize;
        let mut ordered: Vec<&dyn Signer> = Vec::with_capacity(required);
        for key in &message.account_keys[..required] {
            let signer = signers
                .iter()
                .find(|s| s.pubkey() == *key)
                .ok_or(Error::MissingSigner(*key))?;
            ordered.push(*signer);
        }

        let recent_blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| Error::Rpc(format!("{e:#}")))?;

        let mut transaction = Transaction::new_unsigned(message);
        transaction
            .try_sign(&ordered, recent_blockhash)
            .map_err(|e| Error::Build(format!("signature impossible : {e}")))?;

        let signature = self
            .rpc
            .send_transaction(&transaction)
            .await
            .map_err(|e| Error::Submission(format!("{e:#}")))?;
        info!(%signature, instructions = instructions.len(), "Transaction envoyée.");

        if let Some(policy) = self.confirmation {
            self.wait_for_confirmation(&signature, policy).await?;
            info!(%signature, "Transaction confirmée.");
        }
        Ok(signature)
    }

    async fn wait_for_confirmation(&self, signature: &Signature, policy: ConfirmationPolicy) -> Result<()> {
        let poll = async {
            loop {
                match self.rpc.get_signature_state(signature).await {
                    Ok(SignatureState::Confirmed) => return Ok(()),
                    Ok(SignatureState::Failed(err)) => {
                        return Err(Error::Submission(format!("transaction {signature} échouée on-chain : {err}")));
                    }
                    Ok(SignatureState::Pending) => debug!(%signature, "En attente de confirmation..."),
                    // Erreur de lecture transitoire : le timeout borne l'attente.
                    Err(e) => warn!(%signature, error = %e, "Lecture du statut impossible."),
                }
                sleep(policy.poll_interval).await;
            }
        };
        timeout(policy.timeout, poll)
            .await
            .map_err(|_| Error::ConfirmationTimeout(signature.to_string()))?
    }
}
