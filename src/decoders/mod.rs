// src/decoders/mod.rs

pub mod raydium;
pub mod spl_token_decoders;
