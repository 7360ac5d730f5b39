// src/error.rs

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Les erreurs du moteur de swap, regroupées par famille.
///
/// `Config`, `Resolution` et `AccountCreation` sont fatales au démarrage.
/// `InvalidQuote`, `PoolState`, `Build`, `MissingSigner`, `Submission` et
/// `ConfirmationTimeout` sont enregistrées dans le résultat du cycle.
/// `Persistence` remonte toujours jusqu'à l'appelant.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Erreur de configuration : {0}")]
    Config(String),

    #[error("Échec de la résolution des comptes : {0}")]
    Resolution(String),

    #[error("Échec de la création des comptes manquants : {0}")]
    AccountCreation(String),

    #[error("Échec de la lecture des soldes : {0}")]
    BalanceRead(String),

    #[error("Quote invalide : {0}")]
    InvalidQuote(String),

    #[error("État du pool illisible : {0}")]
    PoolState(String),

    #[error("Erreur RPC : {0}")]
    Rpc(String),

    #[error("Construction de la transaction impossible : {0}")]
    Build(String),

    #[error("Signataire manquant : {0}")]
    MissingSigner(Pubkey),

    #[error("Échec de l'envoi de la transaction : {0}")]
    Submission(String),

    #[error("Transaction {0} non confirmée avant le timeout")]
    ConfirmationTimeout(String),

    #[error("Erreur du journal d'exécution : {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, Error>;
