// DANS: src/math/constant_product.rs

use crate::error::{Error, Result};

pub const BPS_DENOMINATOR: u128 = 10_000;

/// Tolérance de slippage historique : 2 % (`* 98 / 100`).
pub const DEFAULT_SLIPPAGE_BPS: u16 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount_in: u64,
    /// Sortie brute de la courbe x*y=k.
    pub amount_out: u64,
    /// Sortie minimale acceptée après slippage, envoyée au programme.
    pub minimum_out: u64,
}

/// Sortie d'un swap contre une courbe à produit constant :
/// `reserve_out * amount_in / (reserve_in + amount_in)`, arrondi à l'inférieur.
pub fn amount_out(reserve_in: u64, reserve_out: u64, amount_in: u64) -> Result<u64> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(Error::InvalidQuote(format!("pool vide (réserves {reserve_in}/{reserve_out})")));
    }
    // reserve_in > 0 : le résultat est strictement inférieur à reserve_out.
    let out = reserve_out as u128 * amount_in as u128 / (reserve_in as u128 + amount_in as u128);
    Ok(out as u64)
}

/// Applique la tolérance de slippage (en points de base) à une sortie brute.
pub fn apply_slippage(amount_out: u64, slippage_bps: u16) -> Result<u64> {
    let slippage_bps = slippage_bps as u128;
    if slippage_bps > BPS_DENOMINATOR {
        return Err(Error::InvalidQuote(format!("slippage de {slippage_bps} bps supérieur à 100 %")));
    }
    Ok((amount_out as u128 * (BPS_DENOMINATOR - slippage_bps) / BPS_DENOMINATOR) as u64)
}

/// Calcule la sortie minimale acceptable d'un swap. Une sortie minimale nulle
/// signifie que le montant est trop petit face aux réserves : aucun swap ne doit partir.
pub fn quote(reserve_in: u64, reserve_out: u64, amount_in: u64, slippage_bps: u16) -> Result<SwapQuote> {
    let amount_out = amount_out(reserve_in, reserve_out, amount_in)?;
    let minimum_out = apply_slippage(amount_out, slippage_bps)?;
    if minimum_out == 0 {
        return Err(Error::InvalidQuote(format!(
            "la sortie minimale doit être supérieure à zéro (entrée {amount_in}, réserves {reserve_in}/{reserve_out}), essayez un montant plus grand"
        )));
    }
    Ok(SwapQuote { amount_in, amount_out, minimum_out })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_scenario() {
        let q = quote(1_000_000, 2_000_000, 10_000, DEFAULT_SLIPPAGE_BPS).unwrap();
        assert_eq!(q.amount_out, 19_801);
        assert_eq!(q.minimum_out, 19_404);
    }

    #[test]
    fn default_slippage_matches_ninety_eight_percent() {
        for out in [1u64, 99, 100, 19_801, 1_234_567, u64::MAX / 3] {
            let expected = (out as u128 * 98 / 100) as u64;
            assert_eq!(apply_slippage(out, DEFAULT_SLIPPAGE_BPS).unwrap(), expected);
        }
    }

    #[test]
    fn output_is_strictly_below_reserve_out() {
        let cases = [
            (1u64, 1u64, 1u64),
            (1_000, 1_000_000, u64::MAX),
            (u64::MAX, u64::MAX, u64::MAX),
            (5, 7, 3),
            (1_000_000_000, 50_000, 10),
        ];
        for (r_in, r_out, a_in) in cases {
            assert!(amount_out(r_in, r_out, a_in).unwrap() < r_out, "({r_in}, {r_out}, {a_in})");
        }
        // Sans réserve d'entrée la courbe rendrait toute la réserve de sortie.
        assert!(matches!(amount_out(0, 2_000_000, 10_000), Err(Error::InvalidQuote(_))));
        assert!(matches!(amount_out(1_000, 0, 10_000), Err(Error::InvalidQuote(_))));
    }

    #[test]
    fn empty_pool_is_never_quoted_even_without_slippage() {
        assert!(matches!(quote(0, 2_000_000, 10_000, 0), Err(Error::InvalidQuote(_))));
        assert!(matches!(quote(0, 2_000_000, 10_000, DEFAULT_SLIPPAGE_BPS), Err(Error::InvalidQuote(_))));
        let q = quote(1_000_000, 2_000_000, 10_000, 0).unwrap();
        assert_eq!(q.minimum_out, q.amount_out);
        assert!(q.minimum_out < 2_000_000);
    }

    #[test]
    fn output_decreases_as_reserve_in_grows() {
        let (r_out, a_in) = (2_000_000u64, 10_000u64);
        let mut previous = u64::MAX;
        for r_in in [1u64, 10, 1_000, 100_000, 1_000_000, 50_000_000, u64::MAX / 2] {
            let out = amount_out(r_in, r_out, a_in).unwrap();
            assert!(out <= previous, "r_in={r_in}");
            previous = out;
        }
        assert!(amount_out(1_000, r_out, a_in).unwrap() > amount_out(1_000_000, r_out, a_in).unwrap());
    }

    #[test]
    fn dust_amounts_are_rejected() {
        // 2_000_000 * 1 / 1_000_001 = 1, puis 1 * 98 / 100 = 0
        assert!(matches!(quote(1_000_000, 2_000_000, 1, DEFAULT_SLIPPAGE_BPS), Err(Error::InvalidQuote(_))));
        assert!(matches!(quote(0, 0, 0, DEFAULT_SLIPPAGE_BPS), Err(Error::InvalidQuote(_))));
        assert!(matches!(quote(1_000, 0, 50, DEFAULT_SLIPPAGE_BPS), Err(Error::InvalidQuote(_))));
    }

    #[test]
    fn slippage_above_one_hundred_percent_is_rejected() {
        assert!(apply_slippage(1_000, 10_001).is_err());
        assert_eq!(apply_slippage(1_000, 10_000).unwrap(), 0);
        assert_eq!(apply_slippage(1_000, 0).unwrap(), 1_000);
    }
}
