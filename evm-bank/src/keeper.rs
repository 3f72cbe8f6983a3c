//! EVM Bank Keeper
//!
//! A bank keeper wrapper that lets the EVM work in the 18-decimal evm denom
//! while the native ledger settles in the 6-decimal cosmos denom. An
//! account's EVM-visible balance is
//!
//! ```text
//! spendable(cosmos) * multiplier + spendable(evm)
//! ```
//!
//! Every amount handed to this keeper is in evm units. Whole units move in
//! the cosmos denom; the sub-unit remainder moves in the evm denom, with at
//! most one settlement unit converted to cover it and the dust of whoever
//! received the remainder swept back into settlement units afterwards.
//!
//! The keeper keeps no state of its own and never compensates a failed
//! ledger call: the host discards the enclosing state transition instead.

use common::{sanitize_coins, validate_coins};
use cosmwasm_std::{Addr, Coin, Uint128};

use crate::bank::{BankKeeper, Holder};
use crate::config::BridgeConfig;
use crate::conversion::{ensure_evm_available, sweep_dust};
use crate::error::BridgeError;
use crate::split::split_evm_coins;

/// Spendable balance of an account broken down by denomination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceParts {
    /// Whole settlement units
    pub cosmos: Uint128,
    /// evm dust held as a separate ledger asset
    pub evm: Uint128,
}

#[derive(Debug)]
pub struct EvmBankKeeper<B> {
    bank: B,
    config: BridgeConfig,
}

impl<B: BankKeeper> EvmBankKeeper<B> {
    /// Wrap `bank` with a validated bridge config.
    pub fn new(bank: B, config: BridgeConfig) -> Result<Self, BridgeError> {
        config.validate()?;
        Ok(Self { bank, config })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    pub fn into_inner(self) -> B {
        self.bank
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Total spendable evm balance of `addr`.
    ///
    /// Only the evm denom can be queried; any other denom is a caller bug.
    pub fn get_balance(&self, addr: &Addr, denom: &str) -> Result<Coin, BridgeError> {
        if denom != self.config.evm_denom {
            return Err(BridgeError::UnsupportedDenom {
                denom: denom.to_string(),
                expected: self.config.evm_denom.clone(),
            });
        }

        let parts = self.get_balance_parts(addr)?;
        let total = parts
            .cosmos
            .checked_mul(self.config.multiplier)?
            .checked_add(parts.evm)?;

        Ok(Coin {
            denom: self.config.evm_denom.clone(),
            amount: total,
        })
    }

    /// Spendable cosmos and evm amounts of `addr`, unconverted.
    pub fn get_balance_parts(&self, addr: &Addr) -> Result<BalanceParts, BridgeError> {
        let spendable = self.bank.spendable_coins(addr)?;
        Ok(BalanceParts {
            cosmos: common::amount_of(&spendable, &self.config.cosmos_denom),
            evm: common::amount_of(&spendable, &self.config.evm_denom),
        })
    }

    pub fn spendable_coins(&self, addr: &Addr) -> Result<Vec<Coin>, BridgeError> {
        Ok(self.bank.spendable_coins(addr)?)
    }

    pub fn is_send_enabled_coins(&self, coins: &[Coin]) -> Result<(), BridgeError> {
        Ok(self.bank.is_send_enabled_coins(coins)?)
    }

    // ========================================================================
    // Supply
    // ========================================================================

    /// Mint evm coins to `module`: whole units in the cosmos denom and the
    /// remainder in the evm denom.
    pub fn mint_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BridgeError> {
        let split = split_evm_coins(amount, &self.config)?;

        if !split.cosmos.amount.is_zero() {
            self.bank.mint_coins(module, &[split.cosmos.clone()])?;
        }
        if !split.evm_remainder.is_zero() {
            self.bank.mint_coins(module, &[split.evm_coin(&self.config)])?;
        }

        Ok(())
    }

    /// Burn evm coins from `module`, mirroring [`Self::mint_coins`].
    pub fn burn_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BridgeError> {
        let split = split_evm_coins(amount, &self.config)?;

        if !split.cosmos.amount.is_zero() {
            self.bank.burn_coins(module, &[split.cosmos.clone()])?;
        }
        if !split.evm_remainder.is_zero() {
            self.bank.burn_coins(module, &[split.evm_coin(&self.config)])?;
        }

        Ok(())
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Move evm coins from an account into an escrow module.
    ///
    /// The sender converts at most one settlement unit to cover the
    /// remainder. Afterwards both the sender and the escrow have their dust
    /// swept, so the escrow never accumulates a whole unit it cannot spend.
    pub fn send_coins_from_account_to_module(
        &mut self,
        sender: &Addr,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BridgeError> {
        let split = split_evm_coins(amount, &self.config)?;
        if split.is_zero() {
            return Ok(());
        }

        if !split.cosmos.amount.is_zero() {
            self.bank.send_coins_from_account_to_module(
                sender,
                recipient_module,
                &[split.cosmos.clone()],
            )?;
        }

        if !split.evm_remainder.is_zero() {
            let holder = Holder::account(sender);
            ensure_evm_available(&mut self.bank, &self.config, &holder, split.evm_remainder)?;
            self.bank.send_coins_from_account_to_module(
                sender,
                recipient_module,
                &[split.evm_coin(&self.config)],
            )?;
            sweep_dust(&mut self.bank, &self.config, &holder)?;
            sweep_dust(&mut self.bank, &self.config, &Holder::module(recipient_module))?;
        }

        Ok(())
    }

    /// Move evm coins from an escrow module to an account.
    ///
    /// The escrow converts at most one settlement unit to cover the
    /// remainder, then the recipient has its dust swept.
    pub fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        recipient: &Addr,
        amount: &[Coin],
    ) -> Result<(), BridgeError> {
        let split = split_evm_coins(amount, &self.config)?;
        if split.is_zero() {
            return Ok(());
        }

        if !split.cosmos.amount.is_zero() {
            self.bank.send_coins_from_module_to_account(
                sender_module,
                recipient,
                &[split.cosmos.clone()],
            )?;
        }

        if !split.evm_remainder.is_zero() {
            let escrow = Holder::module(sender_module);
            ensure_evm_available(&mut self.bank, &self.config, &escrow, split.evm_remainder)?;
            self.bank.send_coins_from_module_to_account(
                sender_module,
                recipient,
                &[split.evm_coin(&self.config)],
            )?;
            sweep_dust(&mut self.bank, &self.config, &Holder::account(recipient))?;
        }

        Ok(())
    }

    /// Account to account transfer. Both denoms are native ledger assets, so
    /// the coins move as given with no conversion.
    pub fn send_coins(
        &mut self,
        from: &Addr,
        to: &Addr,
        amount: &[Coin],
    ) -> Result<(), BridgeError> {
        let coins = sanitize_coins(amount);
        if coins.is_empty() {
            return Ok(());
        }

        validate_coins(&coins)?;
        if let Some(coin) = coins
            .iter()
            .find(|c| c.denom != self.config.evm_denom && c.denom != self.config.cosmos_denom)
        {
            return Err(BridgeError::InvalidCoinSet {
                reason: format!(
                    "denom {} cannot move through the evm keeper, expected {} or {}",
                    coin.denom, self.config.evm_denom, self.config.cosmos_denom
                ),
            });
        }

        Ok(self.bank.send_coins(from, to, &coins)?)
    }

    /// Fold `holder`'s whole units of evm dust back into settlement units.
    /// Returns the settlement units produced.
    pub fn sweep(&mut self, holder: &Holder) -> Result<Uint128, BridgeError> {
        sweep_dust(&mut self.bank, &self.config, holder)
    }
}
