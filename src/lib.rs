// src/lib.rs

// Les modules du bot, publics pour que les binaires (twap_bot.rs, setup_wallet.rs)
// puissent les utiliser.
pub mod config;
pub mod decoders;
pub mod error;
pub mod execution;
pub mod math;
pub mod monitoring;
pub mod registry;
pub mod rpc;
pub mod state;
pub mod strategies;
