//! Common - Shared Coin Utilities for the EVM Bank Bridge
//!
//! This package provides the coin-set and denomination helpers used by the
//! bridge keeper and by settlement ledger implementations.

pub mod coins;

pub use coins::{amount_of, sanitize_coins, validate_coins, validate_denom, CoinsError};
