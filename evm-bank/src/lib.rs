//! EVM Bank - Dual-Precision Balance Bridge
//!
//! Lets an embedded EVM operate on an 18-decimal denomination while the
//! native ledger settles in a 6-decimal denomination. Both representations
//! of an account's balance stay consistent and no conversion ever creates
//! or destroys value.
//!
//! # Balance Model
//! - EVM balance = `spendable(cosmos) * multiplier + spendable(evm)`
//! - The evm denom only ever holds sub-unit dust between operations
//!
//! # Operations
//! - `get_balance` - combined spendable balance in evm units
//! - `mint_coins` / `burn_coins` - split into whole units and remainder
//! - `send_coins_from_account_to_module` / `send_coins_from_module_to_account` -
//!   escrow-mediated transfers converting at most one settlement unit, followed
//!   by a dust sweep
//! - `send_coins` - account to account passthrough
//!
//! # Ledger
//! The settlement ledger is external and reached through [`BankKeeper`].
//! [`testing::MockBank`] is an in-memory implementation for tests and
//! embedding hosts.

pub mod bank;
pub mod config;
pub mod conversion;
pub mod error;
pub mod keeper;
pub mod split;
pub mod testing;

pub use crate::bank::{BankKeeper, Holder};
pub use crate::config::BridgeConfig;
pub use crate::error::{BankError, BridgeError};
pub use crate::keeper::{BalanceParts, EvmBankKeeper};
pub use crate::split::{split_evm_coins, validate_evm_coins, SplitAmount};
