// DANS : src/execution/native_wrap.rs

use crate::error::{Error, Result};
use crate::registry::TOKEN_ACCOUNT_SIZE;
use solana_sdk::{
    instruction::Instruction, pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction,
};

/// Compte WSOL temporaire qui ne vit que le temps d'une transaction :
/// création + initialisation, utilisation par le swap, puis fermeture.
pub struct NativeWrap {
    account: Keypair,
    owner: Pubkey,
}

/// Instructions complètes d'un swap enveloppé, plus la clé du compte temporaire
/// qui doit co-signer la transaction.
pub struct WrappedInstructions {
    pub instructions: Vec<Instruction>,
    pub signer: Keypair,
}

impl NativeWrap {
    pub fn new(owner: Pubkey) -> Self {
        Self { account: Keypair::new(), owner }
    }

    /// Construit `create → initialize → <instruction> → close` dans une seule liste.
    /// `deposit` est le montant de SOL déposé en plus de la rente (le montant du
    /// swap quand le SOL est l'entrée, zéro sinon).
    pub fn wrap<F>(self, rent_lamports: u64, deposit: u64, build: F) -> Result<WrappedInstructions>
    where
        F: FnOnce(Pubkey) -> Result<Instruction>,
    {
        let temp = self.account.pubkey();
        let lamports = rent_lamports
            .checked_add(deposit)
            .ok_or_else(|| Error::Build("dépôt WSOL hors limites".to_string()))?;

        let create = system_instruction::create_account(
            &self.owner,
            &temp,
            lamports,
            TOKEN_ACCOUNT_SIZE as u64,
            &spl_token::id(),
        );
        let initialize = spl_token::instruction::initialize_account(
            &spl_token::id(),
            &temp,
            &spl_token::native_mint::id(),
            &self.owner,
        )
        .map_err(|e| Error::Build(format!("initialize_account : {e}")))?;
        let inner = build(temp)?;
        // Les lamports restants (rente + SOL reçu) reviennent au propriétaire.
        let close = spl_token::instruction::close_account(&spl_token::id(), &temp, &self.owner, &self.owner, &[])
            .map_err(|e| Error::Build(format!("close_account : {e}")))?;

        Ok(WrappedInstructions {
            instructions: vec![create, initialize, inner, close],
            signer: self.account,
        })
    }
}
