// DANS : src/strategies/task.rs

use crate::decoders::raydium::amm_v4::AmmPoolKeys;
use crate::error::{Error, Result};
use crate::registry::{Registry, TokenInfo};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::{collections::BTreeMap, fmt, fs, path::Path, str::FromStr};

/// Sens du swap. `Buy` échange `from_mint` contre `to_mint` tels que déclarés
/// dans la paire, `Sell` fait l'inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Buy,
    Sell,
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(Error::Config(format!("sens inconnu : {other} (buy ou sell)"))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        })
    }
}

/// Paramètres d'une tâche tels que saisis (montants décimaux, adresses en texte).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwapTaskParams {
    #[serde(default)]
    pub side: Side,
    pub amount: f64,
    #[serde(default)]
    pub stop_amount: Option<f64>,
    #[serde(default)]
    pub target_amount: Option<f64>,
    #[serde(default)]
    pub transfer_to: Option<String>,
    #[serde(default)]
    pub transfer_threshold: Option<f64>,
}

/// Transfert du solde "to" dès qu'il dépasse `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRule {
    /// Portefeuille pour le SOL natif, compte de jetons sinon.
    pub destination: Pubkey,
    pub threshold: u64,
}

/// Tâche résolue : le sens est appliqué, les montants sont en unités entières.
/// Les plafonds et le seuil sont exprimés dans l'actif "to".
#[derive(Debug, Clone, PartialEq)]
pub struct SwapTask {
    pub pair: String,
    pub side: Side,
    pub pool: AmmPoolKeys,
    pub from: TokenInfo,
    pub to: TokenInfo,
    pub amount: u64,
    pub stop_amount: Option<u64>,
    pub target_amount: Option<u64>,
    pub transfer: Option<TransferRule>,
}

impl SwapTask {
    pub fn from_params(registry: &Registry, pair: &str, params: &SwapTaskParams) -> Result<Self> {
        let pool = registry.pool(pair)?;
        let (from_mint, to_mint) = match params.side {
            Side::Buy => (pool.from_mint, pool.to_mint),
            Side::Sell => (pool.to_mint, pool.from_mint),
        };
        let from = registry.token(&from_mint)?.clone();
        let to = registry.token(&to_mint)?.clone();

        let amount = from.from_ui(params.amount)?;
        if amount == 0 {
            return Err(Error::Config(format!("{pair} : le montant par cycle doit être positif")));
        }
        let stop_amount = params.stop_amount.map(|v| to.from_ui(v)).transpose()?;
        let target_amount = params.target_amount.map(|v| to.from_ui(v)).transpose()?;

        let transfer = match (&params.transfer_to, params.transfer_threshold) {
            (None, None) => None,
            (Some(destination), Some(threshold)) => Some(TransferRule {
                destination: Pubkey::from_str(destination)
                    .map_err(|e| Error::Config(format!("{pair} : destination {destination} invalide : {e}")))?,
                threshold: to.from_ui(threshold)?,
            }),
            _ => {
                return Err(Error::Config(format!(
                    "{pair} : transfer_to et transfer_threshold vont ensemble"
                )));
            }
        };

        Ok(Self {
            pair: pair.to_string(),
            side: params.side,
            pool: pool.raydium.clone(),
            from,
            to,
            amount,
            stop_amount,
            target_amount,
            transfer,
        })
    }

    /// Les mints dont la tâche a besoin d'un compte de détention.
    pub fn mints(&self) -> [Pubkey; 2] {
        [self.from.mint, self.to.mint]
    }
}

/// Fichier de tâches : nom de paire → paramètres.
pub fn load_tasks_file(path: &Path) -> Result<BTreeMap<String, SwapTaskParams>> {
    let data = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("lecture de {} impossible : {e}", path.display())))?;
    serde_json::from_str(&data).map_err(|e| Error::Config(format!("{} invalide : {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NATIVE_SOL;
    use solana_sdk::pubkey;

    const PAIR: &str = "from_sol_to_prt_raydium";
    const PRT: Pubkey = pubkey!("PRT88RkA4Kg5z7pKnezeNH4mafTvtQdfFgpQTGRjz44");

    #[test]
    fn buy_keeps_the_declared_direction() {
        let registry = Registry::builtin().unwrap();
        let params = SwapTaskParams { amount: 0.25, stop_amount: Some(500.0), ..Default::default() };
        let task = SwapTask::from_params(&registry, PAIR, &params).unwrap();
        assert_eq!(task.from.mint, NATIVE_SOL);
        assert_eq!(task.to.mint, PRT);
        assert_eq!(task.amount, 250_000_000);
        // Plafonds exprimés dans l'actif "to" (6 décimales).
        assert_eq!(task.stop_amount, Some(500_000_000));
        assert_eq!(task.target_amount, None);
        assert!(task.transfer.is_none());
    }

    #[test]
    fn sell_reverses_from_and_to() {
        let registry = Registry::builtin().unwrap();
        let params = SwapTaskParams { side: Side::Sell, amount: 12.5, target_amount: Some(1.0), ..Default::default() };
        let task = SwapTask::from_params(&registry, PAIR, &params).unwrap();
        assert_eq!(task.from.mint, PRT);
        assert_eq!(task.to.mint, NATIVE_SOL);
        assert_eq!(task.amount, 12_500_000);
        assert_eq!(task.target_amount, Some(1_000_000_000));
    }

    #[test]
    fn transfer_needs_both_destination_and_threshold() {
        let registry = Registry::builtin().unwrap();
        let destination = Pubkey::new_unique();
        let params = SwapTaskParams {
            amount: 1.0,
            transfer_to: Some(destination.to_string()),
            transfer_threshold: Some(10.0),
            ..Default::default()
        };
        let task = SwapTask::from_params(&registry, PAIR, &params).unwrap();
        assert_eq!(task.transfer, Some(TransferRule { destination, threshold: 10_000_000 }));

        let half = SwapTaskParams { amount: 1.0, transfer_threshold: Some(10.0), ..Default::default() };
        assert!(matches!(SwapTask::from_params(&registry, PAIR, &half), Err(Error::Config(_))));
    }

    #[test]
    fn invalid_inputs_are_configuration_errors() {
        let registry = Registry::builtin().unwrap();
        let zero = SwapTaskParams { amount: 0.0, ..Default::default() };
        assert!(matches!(SwapTask::from_params(&registry, PAIR, &zero), Err(Error::Config(_))));
        let unknown = SwapTaskParams { amount: 1.0, ..Default::default() };
        assert!(matches!(SwapTask::from_params(&registry, "from_btc_to_moon", &unknown), Err(Error::Config(_))));
        assert!("hold".parse::<Side>().is_err());
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
    }

    #[test]
    fn tasks_file_maps_pairs_to_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"{ "from_sol_to_prt_raydium": { "side": "sell", "amount": 2.5, "stop_amount": 100 } }"#).unwrap();
        let tasks = load_tasks_file(&path).unwrap();
        let params = &tasks[PAIR];
        assert_eq!(params.side, Side::Sell);
        assert_eq!(params.amount, 2.5);
        assert_eq!(params.stop_amount, Some(100.0));
        assert_eq!(params.transfer_to, None);
    }
}
