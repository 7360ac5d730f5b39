use crate::error::Error;
use anyhow::Result;
use serde::Deserialize;
use solana_sdk::signature::Keypair;
use std::{fmt, path::PathBuf, time::Duration};

fn default_store_path() -> PathBuf { PathBuf::from("./logs/swaps.json") }
fn default_cycle_interval_secs() -> u64 { 5 }
fn default_cycle_timeout_secs() -> u64 { 120 }
fn default_rpc_max_retries() -> u8 { 3 }
fn default_rpc_retry_delay_ms() -> u64 { 500 }
fn default_confirm_transactions() -> bool { true }
fn default_confirmation_timeout_secs() -> u64 { 60 }
fn default_slippage_bps() -> u16 { 200 }
fn default_skip_preflight() -> bool { true }

/// Configuration lue depuis l'environnement (et le fichier `.env` s'il existe).
#[derive(Deserialize, Clone)]
pub struct Config {
    pub solana_rpc_url: String,
    pub payer_private_key: String,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    // Délai global d'un cycle : tous les appels réseau du cycle partagent cette échéance.
    #[serde(default = "default_cycle_timeout_secs")]
    pub cycle_timeout_secs: u64,
    #[serde(default = "default_rpc_max_retries")]
    pub rpc_max_retries: u8,
    #[serde(default = "default_rpc_retry_delay_ms")]
    pub rpc_retry_delay_ms: u64,
    #[serde(default = "default_confirm_transactions")]
    pub confirm_transactions: bool,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    #[serde(default = "default_skip_preflight")]
    pub skip_preflight: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()?;
        Ok(config)
    }

    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }

    pub fn cycle_timeout(&self) -> Duration {
        Duration::from_secs(self.cycle_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    /// Décode la clé privée base58 du portefeuille payeur.
    pub fn payer_keypair(&self) -> crate::error::Result<Keypair> {
        parse_keypair(&self.payer_private_key)
    }
}

// La clé privée ne doit jamais finir dans les logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("solana_rpc_url", &self.solana_rpc_url)
            .field("payer_private_key", &"<redacted>")
            .field("store_path", &self.store_path)
            .field("cycle_interval_secs", &self.cycle_interval_secs)
            .field("cycle_timeout_secs", &self.cycle_timeout_secs)
            .field("rpc_max_retries", &self.rpc_max_retries)
            .field("rpc_retry_delay_ms", &self.rpc_retry_delay_ms)
            .field("confirm_transactions", &self.confirm_transactions)
            .field("confirmation_timeout_secs", &self.confirmation_timeout_secs)
            .field("slippage_bps", &self.slippage_bps)
            .field("skip_preflight", &self.skip_preflight)
            .finish()
    }
}

pub fn parse_keypair(encoded: &str) -> crate::error::Result<Keypair> {
    let bytes = bs58::decode(encoded.trim())
        .into_vec()
        .map_err(|e| Error::Config(format!("clé privée base58 invalide : {e}")))?;
    Keypair::try_from(bytes.as_slice())
        .map_err(|e| Error::Config(format!("clé privée invalide ({} octets) : {e}", bytes.len())))
}
