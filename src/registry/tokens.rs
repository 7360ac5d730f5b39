use super::{pubkey_string, NATIVE_SOL};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey, pubkey::Pubkey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(with = "pubkey_string")]
    pub mint: Pubkey,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(mint: Pubkey, symbol: &str, decimals: u8) -> Self {
        Self { mint, symbol: symbol.to_string(), decimals }
    }

    /// 10^decimals, l'unité de conversion entre montants entiers et décimaux.
    pub fn scale(&self) -> Result<u64> {
        10u64.checked_pow(self.decimals as u32).ok_or_else(|| {
            Error::Config(format!("{} : {} décimales dépassent u64", self.symbol, self.decimals))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.scale().map(|_| ())
    }

    /// Montant entier (plus petite unité) vers montant décimal.
    pub fn to_ui(&self, amount: u64) -> f64 {
        amount as f64 / 10f64.powi(self.decimals as i32)
    }

    /// Montant décimal vers montant entier. Un montant négatif, non fini ou
    /// hors de `u64` est une erreur de configuration.
    pub fn from_ui(&self, value: f64) -> Result<u64> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::Config(format!("{} : montant invalide {value}", self.symbol)));
        }
        let scaled = (value * 10f64.powi(self.decimals as i32)).round();
        if scaled >= u64::MAX as f64 {
            return Err(Error::Config(format!("{} : montant {value} hors limites", self.symbol)));
        }
        Ok(scaled as u64)
    }
}

pub fn builtin_tokens() -> Vec<TokenInfo> {
    vec![
        TokenInfo::new(NATIVE_SOL, "SOL", 9),
        TokenInfo::new(spl_token::native_mint::id(), "WSOL", 9),
        // Parrot
        TokenInfo::new(pubkey!("Ea5SjE2Y6yvCeW5dYTn7PYMuW5ikXkvbGdcmSnXeaLjS"), "PAI", 6),
        TokenInfo::new(pubkey!("PRT88RkA4Kg5z7pKnezeNH4mafTvtQdfFgpQTGRjz44"), "PRT", 6),
        TokenInfo::new(pubkey!("E2Ub8wPfxxEvdrtumbfeL2HaQHgpd3gUGkDxDmmgN3p9"), "PTT", 9),
        TokenInfo::new(pubkey!("DYDWu4hE4MN3aH897xQ3sRTs5EAjJDmQsKLNhbpUiKun"), "pBTC", 8),
        TokenInfo::new(pubkey!("9EaLkQrbjmbbuZG9Wdpo8qfNUEjHATJFSycEmw6f1rGX"), "pSOL", 9),
        TokenInfo::new(pubkey!("BdZPG9xWrG3uFrx2KrUW1jT4tZ9VKPDWknYihzoPRJS3"), "prtSOL", 9),
        // Principaux
        TokenInfo::new(pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"), "USDC", 6),
        TokenInfo::new(pubkey!("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB"), "USDT", 6),
        TokenInfo::new(pubkey!("SRMuApVNdxXokk5GT7XD5cUUgXMBCoAz2LHeuAoKWRt"), "SRM", 6),
        TokenInfo::new(pubkey!("MERt85fc5boKw3BW1eYdxonEuJNvXbiMbs6hvheau5K"), "MER", 6),
        TokenInfo::new(pubkey!("9n4nbM75f5Ui33ZbPYXn59EwSgE8CGsHtAeTH5YFeJ9E"), "BTC(Sollet)", 6),
        TokenInfo::new(pubkey!("CDJWUqTcYTVAKXAVXoQZFes5JUFc7owSeq7eMQcDSbo5"), "renBTC", 8),
        TokenInfo::new(pubkey!("mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So"), "mSOL", 9),
        // LP Mercurial
        TokenInfo::new(pubkey!("57h4LEnBooHrKbacYWGCFghmrTzYPVn8PwZkzTzRLvHa"), "MER LP USDC-USDT-UST", 9),
        TokenInfo::new(pubkey!("9s6dXtMgV5E6v3rHqBF2LejHcA2GWoZb7xNUkgXgsBqt"), "MER LP USDC-USDT-PAI", 6),
        TokenInfo::new(pubkey!("GHhDU9Y7HM37v6cQyaie1A3aZdfpCDp6ScJ5zZn2c3uk"), "MER LP SOL-pSOL", 9),
        // LP Saber
        TokenInfo::new(pubkey!("PrsVdKtXDDf6kJQu5Ff6YqmjfE4TZXtBgHM4bjuvRnR"), "SBR LP prtSOL-SOL", 9),
        TokenInfo::new(pubkey!("SLPbsNrLHv8xG4cTc4R5Ci8kB9wUPs6yn6f7cKosoxs"), "SBR LP BTC-renBTC", 8),
        TokenInfo::new(pubkey!("SoLEao8wTzSfqhuou8rcYsVoLjthVmiXuEjzdNPMnCz"), "SBR LP mSOL-SOL", 9),
        TokenInfo::new(pubkey!("2poo1w1DL6yd2WNTCnNTzDqkC6MBXq7axo77P16yrBuf"), "SBR LP USDC-USDT", 6),
        TokenInfo::new(pubkey!("UST32f2JtPGocLzsL41B3VBBoJzTm1mK1j3rwyM3Wgc"), "SBR LP UST-USDC", 9),
        // LP Raydium
        TokenInfo::new(pubkey!("8HoQnePLqPj4M7PUDzfw8e3Ymdwgc7NLGnaTUapubyvu"), "RAY LP SOL-USDC", 9),
        TokenInfo::new(pubkey!("3H9NxvaZoxMZZDZcbBDdWMKbrfNj7PCF5sbRwDr7SdDW"), "RAY LP MER-USDC", 6),
    ]
}
