use anyhow::Result;
use solana_program_pack::Pack;
use solana_sdk::{account::Account, pubkey::Pubkey};
use spl_token::state::Account as SplTokenAccount;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSplAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

/// Décode les données brutes d'un compte de jeton SPL.
pub fn decode_account(data: &[u8]) -> Result<DecodedSplAccount> {
    let spl_account = SplTokenAccount::unpack(data)?;
    Ok(DecodedSplAccount {
        mint: spl_account.mint,
        owner: spl_account.owner,
        amount: spl_account.amount,
    })
}

/// Solde d'un compte quelconque : le programme propriétaire décide du décodage.
/// Un compte détenu par SPL Token rapporte son `amount`, tout autre compte ses lamports.
pub fn account_balance(account: &Account) -> Result<u64> {
    if account.owner == spl_token::id() {
        Ok(decode_account(&account.data)?.amount)
    } else {
        Ok(account.lamports)
    }
}
