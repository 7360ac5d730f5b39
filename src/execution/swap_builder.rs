// DANS : src/execution/swap_builder.rs

use crate::decoders::raydium::amm_v4::{swap_base_in, AmmPoolKeys, SwapBaseIn, UserSwapAccounts};
use crate::error::{Error, Result};
use crate::execution::native_wrap::NativeWrap;
use crate::registry::is_native;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Keypair};

/// Un côté du swap : l'actif et le compte de détention du propriétaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapLeg {
    pub mint: Pubkey,
    pub account: Pubkey,
}

/// Liste ordonnée d'instructions prête pour l'exécuteur, avec les signataires
/// supplémentaires (le compte WSOL temporaire le cas échéant).
pub struct SwapPlan {
    pub instructions: Vec<Instruction>,
    pub extra_signers: Vec<Keypair>,
}

impl SwapPlan {
    pub fn needs_native_wrap(from: &SwapLeg, to: &SwapLeg) -> bool {
        is_native(&from.mint) || is_native(&to.mint)
    }
}

/// Construit le swap Raydium. Si un des côtés est du SOL natif, le swap est
/// enveloppé dans un compte WSOL temporaire qui remplace ce côté et qui est
/// fermé dans la même transaction. `rent_lamports` n'est utilisé que dans ce cas.
pub fn build_swap(
    pool: &AmmPoolKeys,
    amount_in: u64,
    minimum_out: u64,
    from: SwapLeg,
    to: SwapLeg,
    owner: &Pubkey,
    rent_lamports: u64,
) -> Result<SwapPlan> {
    if is_native(&from.mint) && is_native(&to.mint) {
        return Err(Error::Build("swap SOL vers SOL".to_string()));
    }
    let args = SwapBaseIn { amount_in, minimum_amount_out: minimum_out };

    if !SwapPlan::needs_native_wrap(&from, &to) {
        let user = UserSwapAccounts { owner: *owner, source: from.account, destination: to.account };
        return Ok(SwapPlan { instructions: vec![swap_base_in(pool, &user, args)], extra_signers: vec![] });
    }

    let native_is_input = is_native(&from.mint);
    let deposit = if native_is_input { amount_in } else { 0 };
    let wrapped = NativeWrap::new(*owner).wrap(rent_lamports, deposit, |temp| {
        let user = UserSwapAccounts {
            owner: *owner,
            source: if native_is_input { temp } else { from.account },
            destination: if native_is_input { to.account } else { temp },
        };
        Ok(swap_base_in(pool, &user, args))
    })?;

    Ok(SwapPlan { instructions: wrapped.instructions, extra_signers: vec![wrapped.signer] })
}
