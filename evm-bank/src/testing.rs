//! In-memory settlement ledger
//!
//! `MockBank` implements [`BankKeeper`] on top of `cw-storage-plus` maps over
//! a `MemoryStorage`, following the Cosmos SDK bank keeper rules that matter
//! to the bridge: module accounts with minter/burner permissions, blocked
//! recipients, send-disabled denoms, locked (non-spendable) balances and a
//! tracked total supply. Every mutating call is recorded, and the whole
//! state can be snapshotted and restored the way a host rolls back a failed
//! state transition.

use common::validate_coins;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Coin, MemoryStorage, Order, Record, StdResult, Storage, Uint128};
use cw_storage_plus::Map;

use crate::bank::BankKeeper;
use crate::config::BridgeConfig;
use crate::error::{BankError, BridgeError};

// ============================================================================
// Storage
// ============================================================================

/// Total balance per (account, denom)
const BALANCES: Map<(&Addr, &str), Uint128> = Map::new("balances");

/// Non-spendable part of a balance per (account, denom)
const LOCKED: Map<(&Addr, &str), Uint128> = Map::new("locked");

/// Total supply per denom
const SUPPLY: Map<&str, Uint128> = Map::new("supply");

/// Module accounts by name
const MODULES: Map<&str, ModuleAccount> = Map::new("modules");

/// Addresses that may not receive from modules
const BLOCKED: Map<&Addr, bool> = Map::new("blocked");

/// Denoms whose account-to-account sends are disabled
const SEND_DISABLED: Map<&str, bool> = Map::new("send_disabled");

// ============================================================================
// Types
// ============================================================================

#[cw_serde]
pub enum Permission {
    Minter,
    Burner,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Minter => "minter",
            Permission::Burner => "burner",
        }
    }
}

#[cw_serde]
pub struct ModuleAccount {
    pub name: String,
    pub address: Addr,
    pub permissions: Vec<Permission>,
}

/// A mutating ledger call, as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BankCall {
    Send {
        from: Addr,
        to: Addr,
        amount: Vec<Coin>,
    },
    AccountToModule {
        sender: Addr,
        module: String,
        amount: Vec<Coin>,
    },
    ModuleToAccount {
        module: String,
        recipient: Addr,
        amount: Vec<Coin>,
    },
    ModuleToModule {
        sender: String,
        recipient: String,
        amount: Vec<Coin>,
    },
    Mint {
        module: String,
        amount: Vec<Coin>,
    },
    Burn {
        module: String,
        amount: Vec<Coin>,
    },
}

impl BankCall {
    pub fn is_mint(&self) -> bool {
        matches!(self, BankCall::Mint { .. })
    }

    pub fn is_burn(&self) -> bool {
        matches!(self, BankCall::Burn { .. })
    }
}

/// Full copy of the ledger state.
#[derive(Clone, Debug)]
pub struct BankSnapshot(Vec<Record>);

// ============================================================================
// MockBank
// ============================================================================

#[derive(Default)]
pub struct MockBank {
    storage: MemoryStorage,
    calls: Vec<BankCall>,
}

impl std::fmt::Debug for MockBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBank")
            .field("calls", &self.calls.len())
            .finish_non_exhaustive()
    }
}

impl MockBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module account.
    pub fn with_module(mut self, name: &str, permissions: &[Permission]) -> StdResult<Self> {
        self.add_module(name, permissions)?;
        Ok(self)
    }

    pub fn add_module(&mut self, name: &str, permissions: &[Permission]) -> StdResult<Addr> {
        let account = ModuleAccount {
            name: name.to_string(),
            address: Addr::unchecked(format!("{}_module_account", name)),
            permissions: permissions.to_vec(),
        };
        MODULES.save(&mut self.storage, name, &account)?;
        Ok(account.address)
    }

    /// Credit genesis balances, growing the supply.
    pub fn fund(&mut self, addr: &Addr, coins: &[Coin]) -> Result<(), BankError> {
        validate_coins(coins)?;
        for coin in coins {
            self.add(addr, coin)?;
            self.adjust_supply(&coin.denom, coin.amount, true)?;
        }
        Ok(())
    }

    /// Lock part of a balance, e.g. an unvested amount.
    pub fn lock(&mut self, addr: &Addr, coin: &Coin) -> StdResult<()> {
        LOCKED.save(&mut self.storage, (addr, &coin.denom), &coin.amount)
    }

    pub fn block(&mut self, addr: &Addr) -> StdResult<()> {
        BLOCKED.save(&mut self.storage, addr, &true)
    }

    pub fn disable_send(&mut self, denom: &str) -> StdResult<()> {
        SEND_DISABLED.save(&mut self.storage, denom, &true)
    }

    /// Total (locked + spendable) balance.
    pub fn balance(&self, addr: &Addr, denom: &str) -> Uint128 {
        BALANCES
            .may_load(&self.storage, (addr, denom))
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn module_balance(&self, module: &str, denom: &str) -> Result<Uint128, BankError> {
        let addr = self.module_address(module)?;
        Ok(self.balance(&addr, denom))
    }

    pub fn supply(&self, denom: &str) -> Uint128 {
        SUPPLY
            .may_load(&self.storage, denom)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// `cosmos * multiplier + evm` summed over `addrs`.
    pub fn total_value(
        &self,
        addrs: &[Addr],
        config: &BridgeConfig,
    ) -> Result<Uint128, BridgeError> {
        addrs.iter().try_fold(Uint128::zero(), |acc, addr| {
            let value = self
                .balance(addr, &config.cosmos_denom)
                .checked_mul(config.multiplier)?
                .checked_add(self.balance(addr, &config.evm_denom))?;
            Ok(acc.checked_add(value)?)
        })
    }

    /// `supply(cosmos) * multiplier + supply(evm)`.
    pub fn total_supply_value(&self, config: &BridgeConfig) -> Result<Uint128, BridgeError> {
        Ok(self
            .supply(&config.cosmos_denom)
            .checked_mul(config.multiplier)?
            .checked_add(self.supply(&config.evm_denom))?)
    }

    pub fn calls(&self) -> &[BankCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn snapshot(&self) -> BankSnapshot {
        BankSnapshot(
            self.storage
                .range(None, None, Order::Ascending)
                .collect(),
        )
    }

    /// Discard every change made since `snapshot` was taken.
    pub fn restore(&mut self, snapshot: BankSnapshot) {
        let mut storage = MemoryStorage::new();
        for (key, value) in snapshot.0 {
            storage.set(&key, &value);
        }
        self.storage = storage;
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn spendable(&self, addr: &Addr, denom: &str) -> Result<Uint128, BankError> {
        let locked = LOCKED
            .may_load(&self.storage, (addr, denom))?
            .unwrap_or_default();
        Ok(self.balance(addr, denom).saturating_sub(locked))
    }

    fn add(&mut self, addr: &Addr, coin: &Coin) -> Result<(), BankError> {
        BALANCES.update(
            &mut self.storage,
            (addr, &coin.denom),
            |balance| -> StdResult<_> {
                Ok(balance.unwrap_or_default().checked_add(coin.amount)?)
            },
        )?;
        Ok(())
    }

    fn sub(&mut self, addr: &Addr, coin: &Coin) -> Result<(), BankError> {
        let available = self.spendable(addr, &coin.denom)?;
        if available < coin.amount {
            return Err(BankError::InsufficientFunds {
                address: addr.to_string(),
                denom: coin.denom.clone(),
                available,
                required: coin.amount,
            });
        }

        let remaining = self.balance(addr, &coin.denom) - coin.amount;
        if remaining.is_zero() {
            BALANCES.remove(&mut self.storage, (addr, &coin.denom));
        } else {
            BALANCES.save(&mut self.storage, (addr, &coin.denom), &remaining)?;
        }
        Ok(())
    }

    fn adjust_supply(
        &mut self,
        denom: &str,
        amount: Uint128,
        increase: bool,
    ) -> Result<(), BankError> {
        SUPPLY.update(&mut self.storage, denom, |supply| -> StdResult<_> {
            let supply = supply.unwrap_or_default();
            if increase {
                Ok(supply.checked_add(amount)?)
            } else {
                Ok(supply.checked_sub(amount)?)
            }
        })?;
        Ok(())
    }

    fn transfer(&mut self, from: &Addr, to: &Addr, amount: &[Coin]) -> Result<(), BankError> {
        validate_coins(amount)?;
        for coin in amount {
            self.sub(from, coin)?;
            self.add(to, coin)?;
        }
        Ok(())
    }

    fn load_module(&self, name: &str) -> Result<ModuleAccount, BankError> {
        MODULES
            .may_load(&self.storage, name)?
            .ok_or_else(|| BankError::UnknownModule {
                module: name.to_string(),
            })
    }

    fn require_permission(&self, name: &str, permission: Permission) -> Result<Addr, BankError> {
        let module = self.load_module(name)?;
        if !module.permissions.contains(&permission) {
            return Err(BankError::MissingPermission {
                module: name.to_string(),
                permission: permission.as_str().to_string(),
            });
        }
        Ok(module.address)
    }

    fn ensure_not_blocked(&self, addr: &Addr) -> Result<(), BankError> {
        if BLOCKED.may_load(&self.storage, addr)?.unwrap_or(false) {
            return Err(BankError::BlockedAddress {
                address: addr.to_string(),
            });
        }
        Ok(())
    }
}

impl BankKeeper for MockBank {
    fn spendable_coins(&self, addr: &Addr) -> Result<Vec<Coin>, BankError> {
        let denoms = BALANCES
            .prefix(addr)
            .keys(&self.storage, None, None, Order::Ascending)
            .collect::<StdResult<Vec<String>>>()?;

        let mut coins = Vec::with_capacity(denoms.len());
        for denom in denoms {
            let amount = self.spendable(addr, &denom)?;
            if !amount.is_zero() {
                coins.push(Coin { denom, amount });
            }
        }
        Ok(coins)
    }

    fn is_send_enabled_coins(&self, coins: &[Coin]) -> Result<(), BankError> {
        for coin in coins {
            if SEND_DISABLED
                .may_load(&self.storage, &coin.denom)?
                .unwrap_or(false)
            {
                return Err(BankError::SendDisabled {
                    denom: coin.denom.clone(),
                });
            }
        }
        Ok(())
    }

    fn module_address(&self, module: &str) -> Result<Addr, BankError> {
        Ok(self.load_module(module)?.address)
    }

    fn send_coins(&mut self, from: &Addr, to: &Addr, amount: &[Coin]) -> Result<(), BankError> {
        self.calls.push(BankCall::Send {
            from: from.clone(),
            to: to.clone(),
            amount: amount.to_vec(),
        });
        self.is_send_enabled_coins(amount)?;
        self.transfer(from, to, amount)
    }

    fn send_coins_from_account_to_module(
        &mut self,
        sender: &Addr,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        self.calls.push(BankCall::AccountToModule {
            sender: sender.clone(),
            module: recipient_module.to_string(),
            amount: amount.to_vec(),
        });
        let recipient = self.module_address(recipient_module)?;
        self.transfer(sender, &recipient, amount)
    }

    fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        recipient: &Addr,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        self.calls.push(BankCall::ModuleToAccount {
            module: sender_module.to_string(),
            recipient: recipient.clone(),
            amount: amount.to_vec(),
        });
        let sender = self.module_address(sender_module)?;
        self.ensure_not_blocked(recipient)?;
        self.transfer(&sender, recipient, amount)
    }

    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        self.calls.push(BankCall::ModuleToModule {
            sender: sender_module.to_string(),
            recipient: recipient_module.to_string(),
            amount: amount.to_vec(),
        });
        let sender = self.module_address(sender_module)?;
        let recipient = self.module_address(recipient_module)?;
        self.transfer(&sender, &recipient, amount)
    }

    fn mint_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BankError> {
        self.calls.push(BankCall::Mint {
            module: module.to_string(),
            amount: amount.to_vec(),
        });
        let addr = self.require_permission(module, Permission::Minter)?;
        validate_coins(amount)?;
        for coin in amount {
            self.add(&addr, coin)?;
            self.adjust_supply(&coin.denom, coin.amount, true)?;
        }
        Ok(())
    }

    fn burn_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BankError> {
        self.calls.push(BankCall::Burn {
            module: module.to_string(),
            amount: amount.to_vec(),
        });
        let addr = self.require_permission(module, Permission::Burner)?;
        validate_coins(amount)?;
        for coin in amount {
            self.sub(&addr, coin)?;
            self.adjust_supply(&coin.denom, coin.amount, false)?;
        }
        Ok(())
    }
}
