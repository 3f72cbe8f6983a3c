//! Bridge configuration
//!
//! The denominations, the conversion escrow and the multiplier are fixed
//! when the keeper is built. Changing the multiplier is a migration, not a
//! runtime operation.

use common::validate_denom;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::error::BridgeError;

// ============================================================================
// Constants
// ============================================================================

/// Default 18-decimal denomination used by the EVM
pub const DEFAULT_EVM_DENOM: &str = "aorai";

/// Default 6-decimal settlement denomination
pub const DEFAULT_COSMOS_DENOM: &str = "orai";

/// Default escrow module allowed to mint and burn during conversions
pub const DEFAULT_CONVERSION_MODULE: &str = "evm";

/// Decimals of the EVM denomination
pub const EVM_DECIMALS: u8 = 18;

/// Decimals of the settlement denomination
pub const COSMOS_DECIMALS: u8 = 6;

/// 10^(18 - 6)
pub const DEFAULT_CONVERSION_MULTIPLIER: u128 = 1_000_000_000_000;

// ============================================================================
// Config
// ============================================================================

#[cw_serde]
pub struct BridgeConfig {
    /// High-precision denomination seen by the EVM
    pub evm_denom: String,
    /// Low-precision settlement denomination of the native ledger
    pub cosmos_denom: String,
    /// Escrow module that mints and burns during conversions
    pub conversion_module: String,
    /// evm units per settlement unit
    pub multiplier: Uint128,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            evm_denom: DEFAULT_EVM_DENOM.to_string(),
            cosmos_denom: DEFAULT_COSMOS_DENOM.to_string(),
            conversion_module: DEFAULT_CONVERSION_MODULE.to_string(),
            multiplier: Uint128::new(DEFAULT_CONVERSION_MULTIPLIER),
        }
    }
}

impl BridgeConfig {
    pub fn new(
        evm_denom: impl Into<String>,
        cosmos_denom: impl Into<String>,
        conversion_module: impl Into<String>,
        multiplier: Uint128,
    ) -> Self {
        Self {
            evm_denom: evm_denom.into(),
            cosmos_denom: cosmos_denom.into(),
            conversion_module: conversion_module.into(),
            multiplier,
        }
    }

    /// Build a config whose multiplier is `10^(evm_decimals - cosmos_decimals)`.
    pub fn from_decimals(
        evm_denom: impl Into<String>,
        cosmos_denom: impl Into<String>,
        conversion_module: impl Into<String>,
        evm_decimals: u8,
        cosmos_decimals: u8,
    ) -> Result<Self, BridgeError> {
        if evm_decimals <= cosmos_decimals {
            return Err(BridgeError::InvalidConfig {
                reason: format!(
                    "evm decimals {} must exceed cosmos decimals {}",
                    evm_decimals, cosmos_decimals
                ),
            });
        }
        let exp = (evm_decimals - cosmos_decimals) as u32;
        let multiplier = 10u128
            .checked_pow(exp)
            .ok_or_else(|| BridgeError::InvalidConfig {
                reason: format!("multiplier 10^{} overflows u128", exp),
            })?;

        Ok(Self::new(
            evm_denom,
            cosmos_denom,
            conversion_module,
            Uint128::new(multiplier),
        ))
    }

    /// Validate the bridge configuration
    pub fn validate(&self) -> Result<(), BridgeError> {
        validate_denom(&self.evm_denom).map_err(|e| BridgeError::InvalidConfig {
            reason: e.to_string(),
        })?;
        validate_denom(&self.cosmos_denom).map_err(|e| BridgeError::InvalidConfig {
            reason: e.to_string(),
        })?;
        if self.evm_denom == self.cosmos_denom {
            return Err(BridgeError::InvalidConfig {
                reason: format!("evm and cosmos denoms are both {}", self.evm_denom),
            });
        }
        if self.conversion_module.trim().is_empty() {
            return Err(BridgeError::InvalidConfig {
                reason: "conversion module name is empty".to_string(),
            });
        }
        if self.multiplier <= Uint128::one() {
            return Err(BridgeError::InvalidConfig {
                reason: format!("multiplier {} must be greater than 1", self.multiplier),
            });
        }
        Ok(())
    }
}
