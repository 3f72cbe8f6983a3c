//! Amount splitting between the settlement and EVM denominations
//!
//! An EVM amount `n` splits into `whole = n / multiplier` settlement units
//! and `remainder = n % multiplier` EVM units, so that
//! `whole * multiplier + remainder == n` with `remainder < multiplier`.

use common::{sanitize_coins, validate_coins};
use cosmwasm_std::{Coin, Uint128};

use crate::config::BridgeConfig;
use crate::error::BridgeError;

/// Result of splitting one EVM amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitAmount {
    /// Whole settlement units, in the cosmos denom
    pub cosmos: Coin,
    /// Sub-unit remainder, in evm units
    pub evm_remainder: Uint128,
}

impl SplitAmount {
    pub fn zero(config: &BridgeConfig) -> Self {
        Self {
            cosmos: Coin::new(0, config.cosmos_denom.clone()),
            evm_remainder: Uint128::zero(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.cosmos.amount.is_zero() && self.evm_remainder.is_zero()
    }

    /// Recombine into an evm amount.
    pub fn merge(&self, multiplier: Uint128) -> Result<Uint128, BridgeError> {
        Ok(self
            .cosmos
            .amount
            .checked_mul(multiplier)?
            .checked_add(self.evm_remainder)?)
    }

    /// The remainder as an evm coin.
    pub fn evm_coin(&self, config: &BridgeConfig) -> Coin {
        Coin {
            denom: config.evm_denom.clone(),
            amount: self.evm_remainder,
        }
    }
}

/// Validate coins headed into the EVM keeper: a valid coin set holding only
/// the evm denom. Zero-amount coins are ignored.
pub fn validate_evm_coins(coins: &[Coin], evm_denom: &str) -> Result<(), BridgeError> {
    let coins = sanitize_coins(coins);
    if coins.is_empty() {
        return Ok(());
    }

    validate_coins(&coins)?;

    if coins.len() != 1 || coins[0].denom != evm_denom {
        return Err(BridgeError::InvalidCoinSet {
            reason: format!(
                "invalid evm coin denom {}, only {} is supported",
                coins
                    .iter()
                    .map(|c| c.denom.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
                evm_denom
            ),
        });
    }

    Ok(())
}

/// Split evm coins into whole settlement units and an evm remainder.
pub fn split_evm_coins(coins: &[Coin], config: &BridgeConfig) -> Result<SplitAmount, BridgeError> {
    validate_evm_coins(coins, &config.evm_denom)?;

    let amount = sanitize_coins(coins)
        .first()
        .map(|c| c.amount)
        .unwrap_or_default();

    split_amount(amount, config)
}

/// Split a raw evm amount.
pub fn split_amount(amount: Uint128, config: &BridgeConfig) -> Result<SplitAmount, BridgeError> {
    let whole = amount.checked_div(config.multiplier).map_err(|e| {
        BridgeError::InvariantViolation {
            reason: e.to_string(),
        }
    })?;
    let remainder = amount.checked_rem(config.multiplier).map_err(|e| {
        BridgeError::InvariantViolation {
            reason: e.to_string(),
        }
    })?;

    let split = SplitAmount {
        cosmos: Coin {
            denom: config.cosmos_denom.clone(),
            amount: whole,
        },
        evm_remainder: remainder,
    };

    if split.merge(config.multiplier)? != amount || remainder >= config.multiplier {
        return Err(BridgeError::InvariantViolation {
            reason: format!("split of {} does not recombine", amount),
        });
    }

    tracing::trace!(
        amount = %amount,
        cosmos = %split.cosmos.amount,
        evm_remainder = %split.evm_remainder,
        "Split evm amount"
    );

    Ok(split)
}
