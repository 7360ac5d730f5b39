// src/registry/mod.rs

//! Tables de référence statiques (jetons et pools), chargées une seule fois
//! au démarrage puis passées explicitement au moteur.

pub mod pools;
pub mod tokens;

use crate::error::{Error, Result};
use serde::Deserialize;
use solana_sdk::{pubkey, pubkey::Pubkey};
use std::{collections::BTreeMap, fs, path::Path};

pub use pools::PoolConfig;
pub use tokens::TokenInfo;

/// SOL natif : le compte de détention est le portefeuille lui-même.
pub const NATIVE_SOL: Pubkey = pubkey!("11111111111111111111111111111111");

/// Taille d'un compte SPL Token (`spl_token::state::Account::LEN`).
pub const TOKEN_ACCOUNT_SIZE: usize = 165;

pub fn is_native(mint: &Pubkey) -> bool {
    *mint == NATIVE_SOL
}

/// Mint SPL effectivement échangé par le pool (le SOL natif passe par WSOL).
pub fn token_mint(mint: &Pubkey) -> Pubkey {
    if is_native(mint) { spl_token::native_mint::id() } else { *mint }
}

#[derive(Debug, Clone)]
pub struct Registry {
    tokens: BTreeMap<Pubkey, TokenInfo>,
    pools: BTreeMap<String, PoolConfig>,
}

/// Format du fichier JSON optionnel qui complète les tables intégrées.
#[derive(Debug, Default, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub tokens: Vec<TokenInfo>,
    #[serde(default)]
    pub pools: BTreeMap<String, PoolConfig>,
}

impl Registry {
    pub fn new(tokens: Vec<TokenInfo>, pools: BTreeMap<String, PoolConfig>) -> Result<Self> {
        let mut registry = Self { tokens: BTreeMap::new(), pools: BTreeMap::new() };
        registry.extend(RegistryFile { tokens, pools })?;
        Ok(registry)
    }

    /// Les tables intégrées au binaire.
    pub fn builtin() -> Result<Self> {
        Self::new(tokens::builtin_tokens(), pools::builtin_pools())
    }

    /// Tables intégrées, éventuellement complétées par un fichier JSON.
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        let mut registry = Self::builtin()?;
        if let Some(path) = extra {
            let data = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("lecture de {} impossible : {e}", path.display())))?;
            let file: RegistryFile = serde_json::from_str(&data)
                .map_err(|e| Error::Config(format!("{} invalide : {e}", path.display())))?;
            registry.extend(file)?;
        }
        Ok(registry)
    }

    fn extend(&mut self, file: RegistryFile) -> Result<()> {
        for token in file.tokens {
            token.validate()?;
            self.tokens.insert(token.mint, token);
        }
        for (name, pool) in file.pools {
            for mint in [pool.from_mint, pool.to_mint] {
                if !self.tokens.contains_key(&mint) {
                    return Err(Error::Config(format!("pool {name} : jeton {mint} inconnu")));
                }
            }
            if pool.from_mint == pool.to_mint {
                return Err(Error::Config(format!("pool {name} : les deux jetons sont identiques")));
            }
            self.pools.insert(name, pool);
        }
        Ok(())
    }

    pub fn token(&self, mint: &Pubkey) -> Result<&TokenInfo> {
        self.tokens
            .get(mint)
            .ok_or_else(|| Error::Config(format!("jeton inconnu : {mint}")))
    }

    pub fn pool(&self, name: &str) -> Result<&PoolConfig> {
        self.pools
            .get(name)
            .ok_or_else(|| Error::Config(format!("paire inconnue : {name}")))
    }

    pub fn pools(&self) -> impl Iterator<Item = (&String, &PoolConfig)> {
        self.pools.iter()
    }
}

/// (Dé)sérialisation d'une `Pubkey` sous forme de chaîne base58.
pub mod pubkey_string {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use solana_sdk::pubkey::Pubkey;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(key)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(|e| D::Error::custom(format!("pubkey invalide {s}: {e}")))
    }
}
