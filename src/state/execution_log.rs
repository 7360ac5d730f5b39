// DANS : src/state/execution_log.rs

use crate::error::{Error, Result};
use crate::state::json_store::JsonStore;
use crate::strategies::task::Side;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::{
    path::Path,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failed,
    Blocked,
}

/// Résultat d'un cycle, figé une fois enregistré.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub pair: String,
    pub pool: String,
    pub timestamp: String,
    pub side: Side,
    pub status: OutcomeStatus,
    pub amount_in: u64,
    pub minimum_out: Option<u64>,
    pub pre_from_balance: u64,
    pub pre_to_balance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Horodatage UTC au format RFC 3339, à la milliseconde.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Journal append-only des cycles. Chaque entrée reçoit une clé unique
/// `"{pair}:{timestamp}:{seq}"` ; une entrée existante n'est jamais réécrite.
/// Les clones partagent le même fichier et la même séquence.
#[derive(Clone)]
pub struct ExecutionLog {
    store: Arc<JsonStore>,
    sequence: Arc<AtomicU64>,
}

impl ExecutionLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = JsonStore::open(path)?;
        let sequence = Arc::new(AtomicU64::new(store.len()? as u64));
        Ok(Self { store: Arc::new(store), sequence })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Comme `record`, mais l'écriture disque (fsync compris) tourne sur le pool
    /// bloquant de tokio plutôt que sur un worker.
    pub async fn append(&self, outcome: SwapOutcome) -> Result<String> {
        let log = self.clone();
        tokio::task::spawn_blocking(move || log.record(&outcome))
            .await
            .map_err(|e| Error::Persistence(format!("écriture du journal interrompue : {e}")))?
    }

    pub fn record(&self, outcome: &SwapOutcome) -> Result<String> {
        loop {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            let key = format!("{}:{}:{seq:06}", outcome.pair, outcome.timestamp);
            if self.store.insert_new(&key, outcome)? {
                debug!(%key, "Résultat du cycle enregistré.");
                return Ok(key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<SwapOutcome>> {
        self.store.get(key)
    }

    pub fn len(&self) -> Result<usize> {
        self.store.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn outcome(status: OutcomeStatus) -> SwapOutcome {
        SwapOutcome {
            pair: "from_sol_to_prt_raydium".to_string(),
            pool: "7rVAbPFzqaBmydukTDFAuBiuyBrTVhpa5LpfDRrjX9mr".to_string(),
            timestamp: timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            side: Side::Buy,
            status,
            amount_in: 10_000,
            minimum_out: Some(19_404),
            pre_from_balance: 1_000_000,
            pre_to_balance: 0,
            tx_id: None,
            error: None,
        }
    }

    #[test]
    fn same_timestamp_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let log = ExecutionLog::open(dir.path().join("swaps.json")).unwrap();
        let first = log.record(&outcome(OutcomeStatus::Success)).unwrap();
        let second = log.record(&outcome(OutcomeStatus::Failed)).unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("from_sol_to_prt_raydium:2024-03-01T12:00:00.000Z:"));
        assert_eq!(log.get(&first).unwrap().unwrap().status, OutcomeStatus::Success);
        assert_eq!(log.get(&second).unwrap().unwrap().status, OutcomeStatus::Failed);
    }

    #[test]
    fn reopened_log_keeps_entries_and_keys_stay_unique() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swaps.json");
        let first = {
            let log = ExecutionLog::open(&path).unwrap();
            log.record(&outcome(OutcomeStatus::Blocked)).unwrap()
        };
        let log = ExecutionLog::open(&path).unwrap();
        assert_eq!(log.len().unwrap(), 1);
        let second = log.record(&outcome(OutcomeStatus::Blocked)).unwrap();
        assert_ne!(first, second);
        assert_eq!(log.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn append_writes_off_the_async_worker() {
        let dir = tempfile::tempdir().unwrap();
        let log = ExecutionLog::open(dir.path().join("swaps.json")).unwrap();
        let first = log.append(outcome(OutcomeStatus::Success)).await.unwrap();
        // Un clone partage la séquence : pas de collision de clé.
        let second = log.clone().append(outcome(OutcomeStatus::Success)).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(log.len().unwrap(), 2);
        let reopened = ExecutionLog::open(log.path()).unwrap();
        assert_eq!(reopened.get(&first).unwrap().unwrap().status, OutcomeStatus::Success);
    }

    #[test]
    fn serialized_form_uses_lowercase_status_and_omits_empty_fields() {
        let value = serde_json::to_value(outcome(OutcomeStatus::Blocked)).unwrap();
        assert_eq!(value["status"], "blocked");
        assert_eq!(value["side"], "buy");
        assert!(value.get("tx_id").is_none());
        assert!(value.get("error").is_none());
    }
}
