// DANS : src/strategies/token_swapper.rs

//! Le moteur de décision : un cycle lit les soldes, applique la politique
//! (transfert, plafonds, fonds suffisants) puis déclenche le swap et
//! enregistre exactement un résultat.

use crate::decoders::raydium::amm_v4::fetch_reserves;
use crate::error::{Error, Result};
use crate::execution::transfer::{build_transfer, transferable_amount};
use crate::execution::{build_swap, SwapLeg, SwapPlan, TransactionExecutor};
use crate::math::constant_product::{quote, SwapQuote};
use crate::registry::{token_mint, TOKEN_ACCOUNT_SIZE};
use crate::rpc::ChainRpc;
use crate::state::accounts::{ensure_accounts, HoldingAccounts};
use crate::state::balances::read_balances;
use crate::state::execution_log::{timestamp, ExecutionLog, OutcomeStatus, SwapOutcome};
use crate::strategies::task::{SwapTask, TransferRule};
use chrono::Utc;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::{fmt, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    StopAmountReached,
    TargetAmountReached,
    InsufficientBalance,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlockReason::StopAmountReached => "stop amount reached",
            BlockReason::TargetAmountReached => "target amount reached",
            BlockReason::InsufficientBalance => "insufficient balance",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleResult {
    Swapped(Signature),
    SwapFailed(String),
    Blocked(BlockReason),
}

/// Ce que le planificateur reçoit après chaque cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub pair: String,
    pub log_key: String,
    pub result: CycleResult,
    pub transferred: Option<Signature>,
}

impl CycleReport {
    /// Plafond atteint : continuer à planifier cette tâche n'a plus de sens.
    pub fn should_stop(&self) -> bool {
        matches!(
            self.result,
            CycleResult::Blocked(BlockReason::StopAmountReached | BlockReason::TargetAmountReached)
        )
    }
}

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Mise à jour des soldes impossible : {0}")]
    UpdateBalances(#[source] Error),

    #[error("Cycle abandonné après {0:?}")]
    Abandoned(Duration),

    #[error("Résultat du cycle non enregistré : {0}")]
    Persistence(#[source] Error),

    #[error("Aucun compte de détention résolu pour le mint {0}")]
    UnknownAccount(Pubkey),
}

pub struct TokenSwapper {
    rpc: Arc<dyn ChainRpc>,
    executor: TransactionExecutor,
    log: ExecutionLog,
    payer: Arc<Keypair>,
    accounts: HoldingAccounts,
    slippage_bps: u16,
    cycle_timeout: Duration,
}

impl TokenSwapper {
    /// Résout (et crée au besoin) les comptes de détention de toutes les tâches.
    /// Les comptes sont ensuite fixes pour toute la vie du processus.
    pub async fn initialize(
        rpc: Arc<dyn ChainRpc>,
        executor: TransactionExecutor,
        log: ExecutionLog,
        payer: Arc<Keypair>,
        tasks: &[SwapTask],
        slippage_bps: u16,
        cycle_timeout: Duration,
    ) -> Result<Self> {
        let mints: Vec<Pubkey> = tasks.iter().flat_map(|t| t.mints()).collect();
        let accounts = ensure_accounts(rpc.as_ref(), &executor, &payer, &mints).await?;
        info!(comptes = accounts.len(), "Comptes de détention prêts.");
        Ok(Self { rpc, executor, log, payer, accounts, slippage_bps, cycle_timeout })
    }

    pub fn accounts(&self) -> &HoldingAccounts {
        &self.accounts
    }

    pub fn log(&self) -> &ExecutionLog {
        &self.log
    }

    /// Un cycle complet, borné par `cycle_timeout`. À l'expiration, le cycle est
    /// abandonné avec tous ses appels RPC en cours et rien n'est enregistré.
    pub async fn run_cycle(&self, task: &SwapTask) -> std::result::Result<CycleReport, CycleError> {
        match timeout(self.cycle_timeout, self.cycle(task)).await {
            Ok(report) => report,
            Err(_) => {
                warn!(pair = %task.pair, timeout = ?self.cycle_timeout, "Cycle abandonné.");
                Err(CycleError::Abandoned(self.cycle_timeout))
            }
        }
    }

    fn account(&self, mint: &Pubkey) -> std::result::Result<Pubkey, CycleError> {
        self.accounts.get(mint).copied().ok_or(CycleError::UnknownAccount(*mint))
    }

    async fn cycle(&self, task: &SwapTask) -> std::result::Result<CycleReport, CycleError> {
        let from = SwapLeg { mint: task.from.mint, account: self.account(&task.from.mint)? };
        let to = SwapLeg { mint: task.to.mint, account: self.account(&task.to.mint)? };

        let snapshot = read_balances(self.rpc.as_ref(), &[from.account, to.account])
            .await
            .map_err(CycleError::UpdateBalances)?;
        let missing = |account: Pubkey| CycleError::UpdateBalances(Error::BalanceRead(format!("solde absent pour {account}")));
        let from_balance = snapshot.get(&from.account).ok_or_else(|| missing(from.account))?;
        let mut to_balance = snapshot.get(&to.account).ok_or_else(|| missing(to.account))?;
        info!(
            pair = %task.pair,
            from = %task.from.symbol,
            to = %task.to.symbol,
            from_balance = task.from.to_ui(from_balance),
            to_balance = task.to.to_ui(to_balance),
            "Soldes mis à jour."
        );

        let mut outcome = SwapOutcome {
            pair: task.pair.clone(),
            pool: task.pool.amm_id.to_string(),
            timestamp: timestamp(Utc::now()),
            side: task.side,
            status: OutcomeStatus::Blocked,
            amount_in: task.amount,
            minimum_out: None,
            pre_from_balance: from_balance,
            pre_to_balance: to_balance,
            tx_id: None,
            error: None,
        };

        let mut transferred = None;
        if let Some(rule) = task.transfer.filter(|rule| to_balance > rule.threshold) {
            if let Some((signature, amount)) = self.transfer(task, &to, to_balance, rule).await {
                // Sans confirmation, rien ne garantit que le transfert a abouti :
                // les plafonds restent évalués sur le solde lu.
                if self.executor.confirms() {
                    to_balance -= amount;
                }
                transferred = Some(signature);
            }
        }

        let result = match self.evaluate(task, from_balance, to_balance) {
            Some(reason) => {
                info!(pair = %task.pair, %reason, "Swap bloqué.");
                outcome.error = Some(reason.to_string());
                CycleResult::Blocked(reason)
            }
            None => {
                let (minimum_out, swapped) = self.swap(task, from, to).await;
                outcome.minimum_out = minimum_out;
                match swapped {
                    Ok(signature) => {
                        info!(pair = %task.pair, %signature, amount_in = task.amount, "Swap exécuté.");
                        outcome.status = OutcomeStatus::Success;
                        outcome.tx_id = Some(signature.to_string());
                        CycleResult::Swapped(signature)
                    }
                    Err(e) => {
                        warn!(pair = %task.pair, error = %e, "Échec du swap.");
                        outcome.status = OutcomeStatus::Failed;
                        outcome.error = Some(e.to_string());
                        CycleResult::SwapFailed(e.to_string())
                    }
                }
            }
        };

        let log_key = self.log.append(outcome).await.map_err(CycleError::Persistence)?;
        Ok(CycleReport { pair: task.pair.clone(), log_key, result, transferred })
    }

    /// Politique du cycle, dans l'ordre : stop, target, fonds suffisants.
    fn evaluate(&self, task: &SwapTask, from_balance: u64, to_balance: u64) -> Option<BlockReason> {
        if task.stop_amount.is_some_and(|stop| to_balance > stop) {
            return Some(BlockReason::StopAmountReached);
        }
        if task.target_amount.is_some_and(|target| to_balance > target) {
            return Some(BlockReason::TargetAmountReached);
        }
        if task.amount > from_balance {
            return Some(BlockReason::InsufficientBalance);
        }
        None
    }

    /// Un échec de transfert est journalisé et n'interrompt pas le cycle.
    async fn transfer(&self, task: &SwapTask, to: &SwapLeg, balance: u64, rule: TransferRule) -> Option<(Signature, u64)> {
        let amount = transferable_amount(&to.mint, balance);
        if amount == 0 {
            return None;
        }
        let instruction = match build_transfer(&to.mint, &to.account, &rule.destination, &self.payer.pubkey(), amount) {
            Ok(ix) => ix,
            Err(e) => {
                warn!(pair = %task.pair, error = %e, "Transfert impossible.");
                return None;
            }
        };
        match self.executor.execute(&[instruction], &[self.payer.as_ref()]).await {
            Ok(signature) => {
                info!(pair = %task.pair, %signature, destination = %rule.destination, amount = task.to.to_ui(amount), "Solde transféré.");
                Some((signature, amount))
            }
            Err(e) => {
                warn!(pair = %task.pair, error = %e, "Échec du transfert, le cycle continue.");
                None
            }
        }
    }

    /// Retourne la sortie minimale si la quote a pu être calculée, et le résultat de l'exécution.
    async fn swap(&self, task: &SwapTask, from: SwapLeg, to: SwapLeg) -> (Option<u64>, Result<Signature>) {
        let (quote, plan) = match self.prepare_swap(task, from, to).await {
            Ok(prepared) => prepared,
            Err(e) => return (None, Err(e)),
        };
        let mut signers: Vec<&Keypair> = vec![self.payer.as_ref()];
        signers.extend(plan.extra_signers.iter());
        let result = self.executor.execute(&plan.instructions, &signers).await;
        (Some(quote.minimum_out), result)
    }

    async fn prepare_swap(&self, task: &SwapTask, from: SwapLeg, to: SwapLeg) -> Result<(SwapQuote, SwapPlan)> {
        let reserves = fetch_reserves(self.rpc.as_ref(), &task.pool).await?;
        let (reserve_in, reserve_out) = reserves.oriented(&token_mint(&from.mint))?;
        let quote = quote(reserve_in, reserve_out, task.amount, self.slippage_bps)?;

        let rent_lamports = if SwapPlan::needs_native_wrap(&from, &to) {
            self.rpc
                .get_minimum_balance_for_rent_exemption(TOKEN_ACCOUNT_SIZE)
                .await
                .map_err(|e| Error::Rpc(format!("{e:#}")))?
        } else {
            0
        };

        let plan = build_swap(&task.pool, quote.amount_in, quote.minimum_out, from, to, &self.payer.pubkey(), rent_lamports)?;
        Ok((quote, plan))
    }
}
