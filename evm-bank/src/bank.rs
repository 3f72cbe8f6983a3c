//! Settlement ledger interface
//!
//! The bridge never stores balances itself. Every read and mutation goes
//! through a [`BankKeeper`], which holds both the settlement denomination and
//! the high-precision denomination as ordinary ledger assets. Escrow accounts
//! are addressed by module name and resolved by the ledger.

use std::fmt;

use common::amount_of;
use cosmwasm_std::{Addr, Coin, Uint128};

use crate::error::BankError;

/// Multi-denomination ledger primitives consumed by the bridge.
///
/// Implementations run inside the host's state transition: a failed call
/// may leave earlier calls of the same transition applied, and the host is
/// expected to discard the whole transition.
pub trait BankKeeper {
    /// Spendable (unlocked) balances of an account.
    fn spendable_coins(&self, addr: &Addr) -> Result<Vec<Coin>, BankError>;

    /// Fails when any of the denoms is not transferable.
    fn is_send_enabled_coins(&self, coins: &[Coin]) -> Result<(), BankError>;

    /// Resolve an escrow module name to its account address.
    fn module_address(&self, module: &str) -> Result<Addr, BankError>;

    fn send_coins(&mut self, from: &Addr, to: &Addr, amount: &[Coin]) -> Result<(), BankError>;

    fn send_coins_from_account_to_module(
        &mut self,
        sender: &Addr,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError>;

    fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        recipient: &Addr,
        amount: &[Coin],
    ) -> Result<(), BankError>;

    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError>;

    /// Requires the module to hold minter permission.
    fn mint_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BankError>;

    /// Requires the module to hold burner permission.
    fn burn_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BankError>;

    /// Spendable amount of a single denom.
    fn spendable_amount(&self, addr: &Addr, denom: &str) -> Result<Uint128, BankError> {
        Ok(amount_of(&self.spendable_coins(addr)?, denom))
    }
}

impl<T: BankKeeper + ?Sized> BankKeeper for &mut T {
    fn spendable_coins(&self, addr: &Addr) -> Result<Vec<Coin>, BankError> {
        (**self).spendable_coins(addr)
    }

    fn is_send_enabled_coins(&self, coins: &[Coin]) -> Result<(), BankError> {
        (**self).is_send_enabled_coins(coins)
    }

    fn module_address(&self, module: &str) -> Result<Addr, BankError> {
        (**self).module_address(module)
    }

    fn send_coins(&mut self, from: &Addr, to: &Addr, amount: &[Coin]) -> Result<(), BankError> {
        (**self).send_coins(from, to, amount)
    }

    fn send_coins_from_account_to_module(
        &mut self,
        sender: &Addr,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        (**self).send_coins_from_account_to_module(sender, recipient_module, amount)
    }

    fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        recipient: &Addr,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        (**self).send_coins_from_module_to_account(sender_module, recipient, amount)
    }

    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        (**self).send_coins_from_module_to_module(sender_module, recipient_module, amount)
    }

    fn mint_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BankError> {
        (**self).mint_coins(module, amount)
    }

    fn burn_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BankError> {
        (**self).burn_coins(module, amount)
    }
}

/// Owner of a balance taking part in a conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Holder {
    /// Plain account
    Account(Addr),
    /// Escrow module account, by name
    Module(String),
}

impl Holder {
    pub fn account(addr: &Addr) -> Self {
        Holder::Account(addr.clone())
    }

    pub fn module(name: &str) -> Self {
        Holder::Module(name.to_string())
    }

    /// Resolve to the address whose balances the ledger reports.
    pub fn address<B: BankKeeper + ?Sized>(&self, bank: &B) -> Result<Addr, BankError> {
        match self {
            Holder::Account(addr) => Ok(addr.clone()),
            Holder::Module(name) => bank.module_address(name),
        }
    }

    pub fn is_module(&self, name: &str) -> bool {
        matches!(self, Holder::Module(m) if m == name)
    }

    /// Move `amount` from this holder into `module`.
    pub(crate) fn send_to_module<B: BankKeeper + ?Sized>(
        &self,
        bank: &mut B,
        module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        match self {
            Holder::Account(addr) => bank.send_coins_from_account_to_module(addr, module, amount),
            Holder::Module(name) => bank.send_coins_from_module_to_module(name, module, amount),
        }
    }

    /// Move `amount` from `module` into this holder.
    pub(crate) fn receive_from_module<B: BankKeeper + ?Sized>(
        &self,
        bank: &mut B,
        module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        match self {
            Holder::Account(addr) => bank.send_coins_from_module_to_account(module, addr, amount),
            Holder::Module(name) => bank.send_coins_from_module_to_module(module, name, amount),
        }
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Holder::Account(addr) => write!(f, "{}", addr),
            Holder::Module(name) => write!(f, "module:{}", name),
        }
    }
}
