// DANS : src/bin/setup_wallet.rs

use anyhow::{Context, Result};
use clap::Parser;
use solana_sdk::{pubkey::Pubkey, signer::Signer};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use twap::{
    config::Config,
    execution::{ConfirmationPolicy, TransactionExecutor},
    monitoring::setup_logging,
    registry::Registry,
    rpc::{ChainRpc, ResilientRpcClient},
    state::ensure_accounts,
};

/// Crée d'avance tous les comptes de jetons dont les paires du registre ont besoin.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Limite la préparation à une seule paire.
    #[arg(long)]
    pair: Option<String>,

    #[arg(long, env = "REGISTRY_FILE")]
    registry_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let args = Args::parse();
    let config = Config::load().context("configuration invalide")?;
    let payer = config.payer_keypair()?;
    let registry = Registry::load(args.registry_file.as_deref())?;

    let mints: Vec<Pubkey> = match &args.pair {
        Some(pair) => {
            let pool = registry.pool(pair)?;
            vec![pool.from_mint, pool.to_mint]
        }
        None => registry.pools().flat_map(|(_, pool)| [pool.from_mint, pool.to_mint]).collect(),
    };
    info!(wallet = %payer.pubkey(), rpc_url = %config.solana_rpc_url, mints = mints.len(), "Préparation du portefeuille.");

    let rpc: Arc<dyn ChainRpc> = Arc::new(ResilientRpcClient::new(
        config.solana_rpc_url.clone(),
        config.rpc_max_retries,
        config.rpc_retry_delay_ms,
    ));
    // Ici on attend toujours la confirmation : le bot suppose ces comptes existants.
    let executor = TransactionExecutor::new(rpc.clone(), Some(ConfirmationPolicy::new(config.confirmation_timeout())));

    let accounts = ensure_accounts(rpc.as_ref(), &executor, &payer, &mints).await?;
    for (mint, account) in &accounts {
        let symbol = registry.token(mint).map(|t| t.symbol.as_str()).unwrap_or("?");
        info!(%mint, %account, symbol, "Compte de détention prêt.");
    }
    Ok(())
}
