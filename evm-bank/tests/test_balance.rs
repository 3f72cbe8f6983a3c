//! Balance reading tests.
//!
//! The EVM-visible balance of an account is its spendable settlement balance
//! scaled by the multiplier plus its spendable evm dust.

use cosmwasm_std::{coin, Addr, Uint128};

use evm_bank::testing::{MockBank, Permission};
use evm_bank::{BalanceParts, BridgeConfig, BridgeError, EvmBankKeeper};

// ============================================================================
// Test Setup
// ============================================================================

const MULTIPLIER: u128 = 1_000_000;

fn setup() -> (EvmBankKeeper<MockBank>, Addr) {
    let bank = MockBank::new()
        .with_module("evm", &[Permission::Minter, Permission::Burner])
        .unwrap();
    let keeper = EvmBankKeeper::new(
        bank,
        BridgeConfig::new("aorai", "orai", "evm", Uint128::new(MULTIPLIER)),
    )
    .unwrap();
    (keeper, Addr::unchecked("orai1user"))
}

// ============================================================================
// GetBalance
// ============================================================================

#[test]
fn test_balance_combines_both_denoms() {
    let (mut keeper, user) = setup();
    keeper
        .bank_mut()
        .fund(&user, &[coin(250_000, "aorai"), coin(3, "orai")])
        .unwrap();

    let balance = keeper.get_balance(&user, "aorai").unwrap();

    assert_eq!(balance, coin(3_250_000, "aorai"));
}

#[test]
fn test_balance_of_empty_account_is_zero() {
    let (keeper, user) = setup();

    let balance = keeper.get_balance(&user, "aorai").unwrap();

    assert_eq!(balance, coin(0, "aorai"));
}

#[test]
fn test_balance_ignores_other_denoms() {
    let (mut keeper, user) = setup();
    keeper
        .bank_mut()
        .fund(
            &user,
            &[coin(7, "aorai"), coin(1, "orai"), coin(999, "uatom")],
        )
        .unwrap();

    let balance = keeper.get_balance(&user, "aorai").unwrap();

    assert_eq!(balance.amount, Uint128::new(1_000_007));
}

#[test]
fn test_balance_counts_only_spendable_coins() {
    let (mut keeper, user) = setup();
    keeper.bank_mut().fund(&user, &[coin(10, "orai")]).unwrap();
    keeper.bank_mut().lock(&user, &coin(4, "orai")).unwrap();

    let balance = keeper.get_balance(&user, "aorai").unwrap();

    assert_eq!(balance.amount, Uint128::new(6 * MULTIPLIER));
}

#[test]
fn test_balance_rejects_other_denoms() {
    let (keeper, user) = setup();

    let err = keeper.get_balance(&user, "orai").unwrap_err();

    assert_eq!(
        err,
        BridgeError::UnsupportedDenom {
            denom: "orai".to_string(),
            expected: "aorai".to_string(),
        }
    );
    assert!(err.is_contract_violation());
}

#[test]
fn test_balance_does_not_touch_the_ledger() {
    let (mut keeper, user) = setup();
    keeper.bank_mut().fund(&user, &[coin(5, "orai")]).unwrap();

    keeper.get_balance(&user, "aorai").unwrap();
    keeper.get_balance_parts(&user).unwrap();

    assert!(keeper.bank().calls().is_empty());
}

#[test]
fn test_balance_parts() {
    let (mut keeper, user) = setup();
    keeper
        .bank_mut()
        .fund(&user, &[coin(42, "aorai"), coin(9, "orai")])
        .unwrap();

    let parts = keeper.get_balance_parts(&user).unwrap();

    assert_eq!(
        parts,
        BalanceParts {
            cosmos: Uint128::new(9),
            evm: Uint128::new(42),
        }
    );
}

#[test]
fn test_balance_with_default_multiplier() {
    let bank = MockBank::new();
    let mut keeper = EvmBankKeeper::new(bank, BridgeConfig::default()).unwrap();
    let user = Addr::unchecked("orai1user");
    keeper
        .bank_mut()
        .fund(&user, &[coin(1, "aorai"), coin(2, "orai")])
        .unwrap();

    let balance = keeper.get_balance(&user, "aorai").unwrap();

    assert_eq!(balance.amount, Uint128::new(2_000_000_000_001));
}

// ============================================================================
// Passthroughs
// ============================================================================

#[test]
fn test_spendable_coins_passthrough() {
    let (mut keeper, user) = setup();
    keeper
        .bank_mut()
        .fund(&user, &[coin(42, "aorai"), coin(9, "orai")])
        .unwrap();

    assert_eq!(
        keeper.spendable_coins(&user).unwrap(),
        vec![coin(42, "aorai"), coin(9, "orai")]
    );
}

#[test]
fn test_is_send_enabled_passthrough() {
    let (mut keeper, _user) = setup();
    assert!(keeper.is_send_enabled_coins(&[coin(1, "aorai")]).is_ok());

    keeper.bank_mut().disable_send("aorai").unwrap();

    let err = keeper.is_send_enabled_coins(&[coin(1, "aorai")]).unwrap_err();
    assert!(err.is_ledger_failure());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = BridgeConfig {
        multiplier: Uint128::zero(),
        ..BridgeConfig::default()
    };

    let err = EvmBankKeeper::new(MockBank::new(), config).unwrap_err();

    assert!(matches!(err, BridgeError::InvalidConfig { .. }));
}
