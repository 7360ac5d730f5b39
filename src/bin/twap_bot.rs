// DANS : src/bin/twap_bot.rs

use anyhow::{bail, Context, Result};
use clap::Parser;
use solana_sdk::signer::Signer;
use std::{collections::BTreeMap, future::Future, path::PathBuf, sync::Arc};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{error, info, warn};
use twap::{
    config::Config,
    execution::{ConfirmationPolicy, TransactionExecutor},
    monitoring::setup_logging,
    registry::Registry,
    rpc::{ChainRpc, ResilientRpcClient},
    state::ExecutionLog,
    strategies::{load_tasks_file, CycleError, Side, SwapTask, SwapTaskParams, TokenSwapper},
};

/// Swap périodique sur un pool Raydium AMM v4.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Nom de la paire dans le registre (ex. from_sol_to_prt_raydium).
    #[arg(long, env = "PAIR", required_unless_present = "tasks_file")]
    pair: Option<String>,

    #[arg(long, env = "SIDE", default_value = "buy")]
    side: Side,

    /// Montant échangé à chaque cycle, en unités décimales de l'actif "from".
    #[arg(long, env = "AMOUNT", required_unless_present = "tasks_file")]
    amount: Option<f64>,

    /// Plus aucun swap une fois le solde "to" au-dessus de ce montant.
    #[arg(long, env = "STOP_AMOUNT")]
    stop_amount: Option<f64>,

    #[arg(long, env = "TARGET_AMOUNT")]
    target_amount: Option<f64>,

    /// Destination du transfert automatique du solde "to".
    #[arg(long, env = "TRANSFER_TO", requires = "transfer_threshold")]
    transfer_to: Option<String>,

    #[arg(long, env = "TRANSFER_THRESHOLD", requires = "transfer_to")]
    transfer_threshold: Option<f64>,

    /// Fichier JSON paire → paramètres, pour plusieurs tâches à la fois.
    #[arg(long, env = "TASKS_FILE", conflicts_with_all = ["pair", "amount"])]
    tasks_file: Option<PathBuf>,

    /// Jetons et pools supplémentaires (JSON).
    #[arg(long, env = "REGISTRY_FILE")]
    registry_file: Option<PathBuf>,
}

impl Args {
    fn task_params(&self) -> Result<BTreeMap<String, SwapTaskParams>> {
        if let Some(path) = &self.tasks_file {
            return Ok(load_tasks_file(path)?);
        }
        let (Some(pair), Some(amount)) = (&self.pair, self.amount) else {
            bail!("--pair et --amount sont requis sans --tasks-file");
        };
        let params = SwapTaskParams {
            side: self.side,
            amount,
            stop_amount: self.stop_amount,
            target_amount: self.target_amount,
            transfer_to: self.transfer_to.clone(),
            transfer_threshold: self.transfer_threshold,
        };
        Ok(BTreeMap::from([(pair.clone(), params)]))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    let args = Args::parse();
    let config = Config::load().context("configuration invalide")?;

    // --- 1. Configuration : toute erreur ici empêche le démarrage ---
    let payer = Arc::new(config.payer_keypair()?);
    let registry = Registry::load(args.registry_file.as_deref())?;
    let mut tasks = args
        .task_params()?
        .iter()
        .map(|(pair, params)| SwapTask::from_params(&registry, pair, params))
        .collect::<Result<Vec<_>, _>>()?;

    info!(rpc_url = %config.solana_rpc_url, wallet = %payer.pubkey(), "Démarrage du bot de swap.");
    for task in &tasks {
        info!(
            pair = %task.pair,
            side = %task.side,
            from = %task.from.symbol,
            to = %task.to.symbol,
            amount = task.from.to_ui(task.amount),
            "Tâche chargée."
        );
    }

    // --- 2. Comptes de détention : créés une fois, puis fixes ---
    let rpc: Arc<dyn ChainRpc> = Arc::new(
        ResilientRpcClient::new(config.solana_rpc_url.clone(), config.rpc_max_retries, config.rpc_retry_delay_ms)
            .with_skip_preflight(config.skip_preflight),
    );
    let confirmation = config.confirm_transactions.then(|| ConfirmationPolicy::new(config.confirmation_timeout()));
    let executor = TransactionExecutor::new(rpc.clone(), confirmation);
    let log = ExecutionLog::open(&config.store_path)?;
    info!(store = %log.path().display(), entries = log.len()?, "Journal d'exécution ouvert.");

    let swapper = TokenSwapper::initialize(
        rpc,
        executor,
        log,
        payer,
        &tasks,
        config.slippage_bps,
        config.cycle_timeout(),
    )
    .await
    .context("initialisation des comptes impossible")?;

    // --- 3. Boucle : les cycles ne se chevauchent jamais ---
    let mut ticker = interval(config.cycle_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    drive(tokio::signal::ctrl_c(), ticker, async || run_tick(&swapper, &mut tasks).await).await
}

/// Lance `cycle` à chaque tick jusqu'à ce que `shutdown` se termine ou que
/// `cycle` renvoie `false`. `shutdown` est créé une seule fois : un arrêt
/// demandé pendant un cycle est pris en compte dès la fin de ce cycle.
async fn drive<S, F>(shutdown: S, mut ticker: Interval, mut cycle: F) -> Result<()>
where
    S: Future,
    F: AsyncFnMut() -> Result<bool>,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Arrêt demandé.");
                return Ok(());
            }
            _ = ticker.tick() => {
                if !cycle().await? {
                    return Ok(());
                }
            }
        }
    }
}

/// Un passage sur toutes les tâches. Renvoie `false` quand il n'en reste plus.
async fn run_tick(swapper: &TokenSwapper, tasks: &mut Vec<SwapTask>) -> Result<bool> {
    let mut finished = Vec::new();
    for task in tasks.iter() {
        match swapper.run_cycle(task).await {
            Ok(report) => {
                info!(pair = %report.pair, key = %report.log_key, result = ?report.result, "Cycle terminé.");
                if report.should_stop() {
                    finished.push(task.pair.clone());
                }
            }
            Err(CycleError::Persistence(e)) => {
                error!(pair = %task.pair, error = %e, "Journal d'exécution inutilisable, arrêt.");
                return Err(e.into());
            }
            Err(e) => warn!(pair = %task.pair, error = %e, "Cycle en échec, nouvel essai au prochain tick."),
        }
    }
    if !finished.is_empty() {
        tasks.retain(|task| !finished.contains(&task.pair));
        info!(terminees = ?finished, restantes = tasks.len(), "Plafond atteint, tâches retirées.");
    }
    if tasks.is_empty() {
        info!("Plus aucune tâche active.");
        return Ok(false);
    }
    Ok(true)
}
