//! Coin set helpers
//!
//! Mirrors the Cosmos SDK `sdk.Coins` rules: denoms follow the SDK denom
//! syntax, amounts are positive, and a set is sorted by denom with no
//! duplicates. Amounts are `Uint128`, so negative values cannot be expressed.

use cosmwasm_std::{Coin, Uint128};
use thiserror::Error;

/// Minimum denom length accepted by the SDK denom regex
pub const MIN_DENOM_LEN: usize = 3;

/// Maximum denom length accepted by the SDK denom regex
pub const MAX_DENOM_LEN: usize = 128;

#[derive(Error, Debug, PartialEq)]
pub enum CoinsError {
    #[error("Invalid denom: {denom}")]
    InvalidDenom { denom: String },

    #[error("Coin {denom} amount is not positive")]
    ZeroAmount { denom: String },

    #[error("Duplicate denomination {denom}")]
    DuplicateDenom { denom: String },

    #[error("Coins are not sorted: {prev} must come after {next}")]
    Unsorted { prev: String, next: String },
}

/// Validate a denom against `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn validate_denom(denom: &str) -> Result<(), CoinsError> {
    let invalid = || CoinsError::InvalidDenom {
        denom: denom.to_string(),
    };

    if denom.len() < MIN_DENOM_LEN || denom.len() > MAX_DENOM_LEN {
        return Err(invalid());
    }

    let mut chars = denom.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(invalid()),
    }

    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Validate a coin set: valid denoms, positive amounts, strictly ascending denoms.
pub fn validate_coins(coins: &[Coin]) -> Result<(), CoinsError> {
    for coin in coins {
        validate_denom(&coin.denom)?;
        if coin.amount.is_zero() {
            return Err(CoinsError::ZeroAmount {
                denom: coin.denom.clone(),
            });
        }
    }

    for pair in coins.windows(2) {
        let (prev, next) = (&pair[0].denom, &pair[1].denom);
        if prev == next {
            return Err(CoinsError::DuplicateDenom { denom: prev.clone() });
        }
        if prev > next {
            return Err(CoinsError::Unsorted {
                prev: prev.clone(),
                next: next.clone(),
            });
        }
    }

    Ok(())
}

/// Drop zero-amount coins; a zero coin carries no value.
pub fn sanitize_coins(coins: &[Coin]) -> Vec<Coin> {
    coins
        .iter()
        .filter(|c| !c.amount.is_zero())
        .cloned()
        .collect()
}

/// Amount of `denom` in `coins`, zero when absent.
pub fn amount_of(coins: &[Coin], denom: &str) -> Uint128 {
    coins
        .iter()
        .filter(|c| c.denom == denom)
        .fold(Uint128::zero(), |acc, c| acc.saturating_add(c.amount))
}
