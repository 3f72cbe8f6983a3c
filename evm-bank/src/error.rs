//! Error types for the EVM bank bridge
//!
//! `BankError` is the failure model of the settlement ledger. `BridgeError`
//! wraps it and adds the bridge's own contract-violation and invariant-breach
//! errors.

use common::CoinsError;
use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

/// Errors reported by the settlement ledger.
#[derive(Error, Debug, PartialEq)]
pub enum BankError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Insufficient funds: {address} has {available}{denom}, needs {required}{denom}")]
    InsufficientFunds {
        address: String,
        denom: String,
        available: Uint128,
        required: Uint128,
    },

    #[error("Send disabled for denom {denom}")]
    SendDisabled { denom: String },

    #[error("Address {address} is not allowed to receive funds")]
    BlockedAddress { address: String },

    #[error("Module account {module} does not exist")]
    UnknownModule { module: String },

    #[error("Module account {module} does not have {permission} permissions")]
    MissingPermission { module: String, permission: String },

    #[error("Invalid coins: {0}")]
    InvalidCoins(#[from] CoinsError),

    #[error("Ledger rejected the operation: {reason}")]
    Rejected { reason: String },
}

#[derive(Error, Debug, PartialEq)]
pub enum BridgeError {
    #[error("{0}")]
    Bank(#[from] BankError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    // ========================================================================
    // Contract Violations
    // ========================================================================

    #[error("Unsupported denom {denom}: only evm denom {expected} is supported")]
    UnsupportedDenom { denom: String, expected: String },

    #[error("Invalid coin set: {reason}")]
    InvalidCoinSet { reason: String },

    #[error("Invalid bridge config: {reason}")]
    InvalidConfig { reason: String },

    // ========================================================================
    // Invariant Breaches
    // ========================================================================

    #[error("Bridge invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

impl BridgeError {
    /// Caller passed input the bridge never accepts. Hosts should abort.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            BridgeError::UnsupportedDenom { .. }
                | BridgeError::InvalidCoinSet { .. }
                | BridgeError::InvalidConfig { .. }
        )
    }

    /// Bridge arithmetic went wrong. Never expected under correct code.
    pub fn is_invariant_breach(&self) -> bool {
        matches!(
            self,
            BridgeError::InvariantViolation { .. } | BridgeError::Overflow(_)
        )
    }

    /// Expected, caller-recoverable ledger policy failure.
    pub fn is_ledger_failure(&self) -> bool {
        matches!(self, BridgeError::Bank(_))
    }
}

impl From<CoinsError> for BridgeError {
    fn from(err: CoinsError) -> Self {
        BridgeError::InvalidCoinSet {
            reason: err.to_string(),
        }
    }
}
