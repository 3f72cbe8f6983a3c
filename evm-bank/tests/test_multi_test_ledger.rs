//! Bridge tests against the cw-multi-test bank module.
//!
//! `AppBank` adapts a cw-multi-test `App` to the `BankKeeper` interface so the
//! same keeper logic runs against an independent ledger implementation:
//! mints go through `BankSudo::Mint`, burns through `BankMsg::Burn` sent by
//! the module account, and transfers through `send_tokens`.

use std::collections::BTreeMap;

use cosmwasm_std::{coin, coins, Addr, BankMsg, Coin, CosmosMsg, Uint128};
use cw_multi_test::{App, BankSudo, Executor, SudoMsg};

use evm_bank::error::BankError;
use evm_bank::{BankKeeper, BridgeConfig, BridgeError, EvmBankKeeper};

// ============================================================================
// Ledger Adapter
// ============================================================================

struct AppBank {
    app: App,
    modules: BTreeMap<String, Addr>,
}

impl AppBank {
    fn balance(&self, addr: &Addr, denom: &str) -> u128 {
        self.app
            .wrap()
            .query_balance(addr, denom)
            .unwrap()
            .amount
            .u128()
    }
}

fn rejected(err: impl ToString) -> BankError {
    BankError::Rejected {
        reason: err.to_string(),
    }
}

impl BankKeeper for AppBank {
    fn spendable_coins(&self, addr: &Addr) -> Result<Vec<Coin>, BankError> {
        Ok(self.app.wrap().query_all_balances(addr)?)
    }

    fn is_send_enabled_coins(&self, _coins: &[Coin]) -> Result<(), BankError> {
        Ok(())
    }

    fn module_address(&self, module: &str) -> Result<Addr, BankError> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| BankError::UnknownModule {
                module: module.to_string(),
            })
    }

    fn send_coins(&mut self, from: &Addr, to: &Addr, amount: &[Coin]) -> Result<(), BankError> {
        self.app
            .send_tokens(from.clone(), to.clone(), amount)
            .map(|_| ())
            .map_err(rejected)
    }

    fn send_coins_from_account_to_module(
        &mut self,
        sender: &Addr,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        let recipient = self.module_address(recipient_module)?;
        self.send_coins(sender, &recipient, amount)
    }

    fn send_coins_from_module_to_account(
        &mut self,
        sender_module: &str,
        recipient: &Addr,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        let sender = self.module_address(sender_module)?;
        self.send_coins(&sender, recipient, amount)
    }

    fn send_coins_from_module_to_module(
        &mut self,
        sender_module: &str,
        recipient_module: &str,
        amount: &[Coin],
    ) -> Result<(), BankError> {
        let sender = self.module_address(sender_module)?;
        let recipient = self.module_address(recipient_module)?;
        self.send_coins(&sender, &recipient, amount)
    }

    fn mint_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BankError> {
        let addr = self.module_address(module)?;
        self.app
            .sudo(SudoMsg::Bank(BankSudo::Mint {
                to_address: addr.to_string(),
                amount: amount.to_vec(),
            }))
            .map(|_| ())
            .map_err(rejected)
    }

    fn burn_coins(&mut self, module: &str, amount: &[Coin]) -> Result<(), BankError> {
        let addr = self.module_address(module)?;
        self.app
            .execute(
                addr,
                CosmosMsg::Bank(BankMsg::Burn {
                    amount: amount.to_vec(),
                }),
            )
            .map(|_| ())
            .map_err(rejected)
    }
}

// ============================================================================
// Test Setup
// ============================================================================

const MULTIPLIER: u128 = 1_000_000;

fn setup(user_balance: Vec<Coin>) -> (EvmBankKeeper<AppBank>, Addr) {
    let user = Addr::unchecked("orai1user");
    let mut app = App::default();

    app.init_modules(|router, _, storage| {
        if !user_balance.is_empty() {
            router
                .bank
                .init_balance(storage, &user, user_balance)
                .unwrap();
        }
    });

    let mut modules = BTreeMap::new();
    modules.insert("evm".to_string(), Addr::unchecked("orai1evmmodule"));
    modules.insert("fee_collector".to_string(), Addr::unchecked("orai1feecollector"));

    let keeper = EvmBankKeeper::new(
        AppBank { app, modules },
        BridgeConfig::new("aorai", "orai", "evm", Uint128::new(MULTIPLIER)),
    )
    .unwrap();

    (keeper, user)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_get_balance() {
    let (keeper, user) = setup(vec![coin(250_000, "aorai"), coin(3, "orai")]);

    assert_eq!(
        keeper.get_balance(&user, "aorai").unwrap(),
        coin(3_250_000, "aorai")
    );
}

#[test]
fn test_mint_to_module() {
    let (mut keeper, _user) = setup(vec![]);

    keeper.mint_coins("evm", &coins(2_500_000, "aorai")).unwrap();

    let evm = Addr::unchecked("orai1evmmodule");
    assert_eq!(keeper.bank().balance(&evm, "orai"), 2);
    assert_eq!(keeper.bank().balance(&evm, "aorai"), 500_000);
}

#[test]
fn test_send_to_module_with_conversion() {
    let (mut keeper, user) = setup(coins(6, "orai"));

    keeper
        .send_coins_from_account_to_module(
            &user,
            "fee_collector",
            &coins(5_200_000, "aorai"),
        )
        .unwrap();

    let fee_collector = Addr::unchecked("orai1feecollector");
    let evm = Addr::unchecked("orai1evmmodule");
    assert_eq!(keeper.bank().balance(&user, "orai"), 0);
    assert_eq!(keeper.bank().balance(&user, "aorai"), 800_000);
    assert_eq!(keeper.bank().balance(&fee_collector, "orai"), 5);
    assert_eq!(keeper.bank().balance(&fee_collector, "aorai"), 200_000);
    assert_eq!(keeper.bank().balance(&evm, "orai"), 0);
    assert_eq!(keeper.bank().balance(&evm, "aorai"), 0);
}

#[test]
fn test_send_to_module_insufficient_funds_surfaces_ledger_error() {
    let (mut keeper, user) = setup(coins(5, "orai"));

    let err = keeper
        .send_coins_from_account_to_module(
            &user,
            "fee_collector",
            &coins(5_200_000, "aorai"),
        )
        .unwrap_err();

    assert!(matches!(err, BridgeError::Bank(BankError::Rejected { .. })));
    assert!(err.is_ledger_failure());
}

#[test]
fn test_round_trip_through_module() {
    let (mut keeper, user) = setup(coins(10, "orai"));
    let before = keeper.get_balance(&user, "aorai").unwrap();

    for amount in [1u128, 750_000, 3_000_000, 4_999_999] {
        keeper
            .send_coins_from_account_to_module(&user, "evm", &coins(amount, "aorai"))
            .unwrap();
        assert_eq!(
            keeper.get_balance(&user, "aorai").unwrap().amount,
            before.amount - Uint128::new(amount)
        );
        keeper
            .send_coins_from_module_to_account("evm", &user, &coins(amount, "aorai"))
            .unwrap();
    }

    assert_eq!(keeper.get_balance(&user, "aorai").unwrap(), before);
    assert_eq!(keeper.bank().balance(&user, "aorai"), 0);
}
