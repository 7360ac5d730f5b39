use crate::error::{Error, Result};
use crate::registry::is_native;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};

/// Lamports gardés sur le portefeuille lors d'un transfert de SOL natif,
/// pour payer les frais des transactions suivantes.
pub const NATIVE_FEE_RESERVE: u64 = 10_000_000;

/// Montant réellement transférable pour un solde donné.
pub fn transferable_amount(mint: &Pubkey, balance: u64) -> u64 {
    if is_native(mint) { balance.saturating_sub(NATIVE_FEE_RESERVE) } else { balance }
}

/// Transfert du solde "to" vers la destination configurée. Pour le SOL natif,
/// `destination` est un portefeuille ; sinon c'est un compte de jetons du même mint.
pub fn build_transfer(
    mint: &Pubkey,
    source: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<Instruction> {
    if is_native(mint) {
        return Ok(system_instruction::transfer(owner, destination, amount));
    }
    spl_token::instruction::transfer(&spl_token::id(), source, destination, owner, &[], amount)
        .map_err(|e| Error::Build(format!("transfer : {e}")))
}
