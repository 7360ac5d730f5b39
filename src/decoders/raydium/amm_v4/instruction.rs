// DANS: src/decoders/raydium/amm_v4/instruction.rs

//! Encodage binaire de l'instruction `SwapBaseIn` du programme Raydium AMM v4.
//!
//! Données : `[9] ++ amount_in (u64 LE) ++ minimum_amount_out (u64 LE)`, 17 octets.
//! Comptes : 18 entrées dans un ordre fixe, voir [`swap_account_metas`].

use super::{AmmPoolKeys, RAYDIUM_AMM_V4_PROGRAM_ID};
use crate::error::{Error, Result};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Discriminateur de `SwapBaseIn`.
pub const SWAP_BASE_IN_OPCODE: u8 = 9;
pub const SWAP_DATA_LEN: usize = 17;
pub const SWAP_ACCOUNTS_LEN: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapBaseIn {
    pub amount_in: u64,
    pub minimum_amount_out: u64,
}

impl SwapBaseIn {
    pub fn encode(&self) -> [u8; SWAP_DATA_LEN] {
        let mut data = [0u8; SWAP_DATA_LEN];
        data[0] = SWAP_BASE_IN_OPCODE;
        data[1..9].copy_from_slice(&self.amount_in.to_le_bytes());
        data[9..17].copy_from_slice(&self.minimum_amount_out.to_le_bytes());
        data
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() != SWAP_DATA_LEN {
            return Err(Error::Build(format!("SwapBaseIn : {} octets au lieu de {SWAP_DATA_LEN}", data.len())));
        }
        if data[0] != SWAP_BASE_IN_OPCODE {
            return Err(Error::Build(format!("SwapBaseIn : opcode {} inattendu", data[0])));
        }
        // Les tranches ont une longueur fixe, la conversion ne peut pas échouer.
        let mut amount_in = [0u8; 8];
        amount_in.copy_from_slice(&data[1..9]);
        let mut minimum_amount_out = [0u8; 8];
        minimum_amount_out.copy_from_slice(&data[9..17]);
        Ok(Self {
            amount_in: u64::from_le_bytes(amount_in),
            minimum_amount_out: u64::from_le_bytes(minimum_amount_out),
        })
    }
}

/// Les comptes utilisateur de l'instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSwapAccounts {
    pub owner: Pubkey,
    pub source: Pubkey,
    pub destination: Pubkey,
}

/// L'ordre et les drapeaux writable/signer sont imposés par le programme on-chain.
pub fn swap_account_metas(keys: &AmmPoolKeys, user: &UserSwapAccounts) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new(keys.amm_id, false),
        AccountMeta::new_readonly(keys.amm_authority, false),
        AccountMeta::new(keys.open_orders, false),
        AccountMeta::new(keys.target_orders, false),
        AccountMeta::new(keys.coin_vault, false),
        AccountMeta::new(keys.pc_vault, false),
        AccountMeta::new_readonly(keys.market_program_id, false),
        AccountMeta::new(keys.market, false),
        AccountMeta::new(keys.market_bids, false),
        AccountMeta::new(keys.market_asks, false),
        AccountMeta::new(keys.market_event_queue, false),
        AccountMeta::new(keys.market_coin_vault, false),
        AccountMeta::new(keys.market_pc_vault, false),
        AccountMeta::new_readonly(keys.market_vault_signer, false),
        AccountMeta::new(user.source, false),
        AccountMeta::new(user.destination, false),
        AccountMeta::new_readonly(user.owner, true),
    ]
}

pub fn swap_base_in(keys: &AmmPoolKeys, user: &UserSwapAccounts, args: SwapBaseIn) -> Instruction {
    Instruction {
        program_id: RAYDIUM_AMM_V4_PROGRAM_ID,
        accounts: swap_account_metas(keys, user),
        data: args.encode().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_byte_sequence() {
        let args = SwapBaseIn { amount_in: 10_000, minimum_amount_out: 19_404 };
        // 10_000 = 0x2710, 19_404 = 0x4BCC
        let expected: [u8; 17] = [
            9,
            0x10, 0x27, 0, 0, 0, 0, 0, 0,
            0xCC, 0x4B, 0, 0, 0, 0, 0, 0,
        ];
        assert_eq!(args.encode(), expected);
        assert_eq!(SwapBaseIn::decode(&expected).unwrap(), args);
    }

    #[test]
    fn encodes_extreme_values_little_endian() {
        let args = SwapBaseIn { amount_in: u64::MAX, minimum_amount_out: 1 };
        let data = args.encode();
        assert_eq!(&data[1..9], &[0xFF; 8]);
        assert_eq!(&data[9..17], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(SwapBaseIn::decode(&data).unwrap(), args);
    }

    #[test]
    fn rejects_malformed_payloads() {
        let mut data = SwapBaseIn { amount_in: 1, minimum_amount_out: 1 }.encode();
        assert!(SwapBaseIn::decode(&data[..16]).is_err());
        data[0] = 11;
        assert!(SwapBaseIn::decode(&data).is_err());
    }

    #[test]
    fn account_list_has_fixed_order_and_flags() {
        let keys = AmmPoolKeys {
            amm_id: Pubkey::new_unique(),
            amm_authority: Pubkey::new_unique(),
            open_orders: Pubkey::new_unique(),
            target_orders: Pubkey::new_unique(),
            coin_vault: Pubkey::new_unique(),
            pc_vault: Pubkey::new_unique(),
            market_program_id: Pubkey::new_unique(),
            market: Pubkey::new_unique(),
            market_bids: Pubkey::new_unique(),
            market_asks: Pubkey::new_unique(),
            market_event_queue: Pubkey::new_unique(),
            market_coin_vault: Pubkey::new_unique(),
            market_pc_vault: Pubkey::new_unique(),
            market_vault_signer: Pubkey::new_unique(),
        };
        let user = UserSwapAccounts {
            owner: Pubkey::new_unique(),
            source: Pubkey::new_unique(),
            destination: Pubkey::new_unique(),
        };
        let ix = swap_base_in(&keys, &user, SwapBaseIn { amount_in: 5, minimum_amount_out: 4 });
        assert_eq!(ix.program_id, RAYDIUM_AMM_V4_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), SWAP_ACCOUNTS_LEN);

        let expected = [
            (spl_token::id(), false, false),
            (keys.amm_id, true, false),
            (keys.amm_authority, false, false),
            (keys.open_orders, true, false),
            (keys.target_orders, true, false),
            (keys.coin_vault, true, false),
            (keys.pc_vault, true, false),
            (keys.market_program_id, false, false),
            (keys.market, true, false),
            (keys.market_bids, true, false),
            (keys.market_asks, true, false),
            (keys.market_event_queue, true, false),
            (keys.market_coin_vault, true, false),
            (keys.market_pc_vault, true, false),
            (keys.market_vault_signer, false, false),
            (user.source, true, false),
            (user.destination, true, false),
            (user.owner, false, true),
        ];
        for (i, (meta, (pubkey, writable, signer))) in ix.accounts.iter().zip(expected).enumerate() {
            assert_eq!(meta.pubkey, pubkey, "compte {i}");
            assert_eq!(meta.is_writable, writable, "writable {i}");
            assert_eq!(meta.is_signer, signer, "signer {i}");
        }
    }
}
