//! Conversion between settlement units and EVM units
//!
//! A conversion always exchanges whole settlement units for exactly
//! `multiplier` EVM units each, routed through the conversion escrow:
//!
//! 1. holder -> conversion escrow (source denom)
//! 2. conversion escrow burns the source denom
//! 3. conversion escrow mints the target denom
//! 4. conversion escrow -> holder (target denom)
//!
//! The escrow ends each conversion with the balances it started with.
//! Steps 1 and 4 are skipped when the holder is the conversion escrow.

use cosmwasm_std::{Coin, Uint128};

use crate::bank::{BankKeeper, Holder};
use crate::config::BridgeConfig;
use crate::error::BridgeError;

/// Direction of a conversion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Settlement units into EVM units
    CosmosToEvm,
    /// EVM units into settlement units
    EvmToCosmos,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::CosmosToEvm => "cosmos_to_evm",
            Direction::EvmToCosmos => "evm_to_cosmos",
        }
    }
}

/// Convert `units` settlement units held by `holder` in the given direction.
pub fn convert<B: BankKeeper + ?Sized>(
    bank: &mut B,
    config: &BridgeConfig,
    holder: &Holder,
    units: Uint128,
    direction: Direction,
) -> Result<(), BridgeError> {
    if units.is_zero() {
        return Ok(());
    }

    let cosmos = vec![Coin {
        denom: config.cosmos_denom.clone(),
        amount: units,
    }];
    let evm = vec![Coin {
        denom: config.evm_denom.clone(),
        amount: units.checked_mul(config.multiplier)?,
    }];
    let (source, target) = match direction {
        Direction::CosmosToEvm => (cosmos, evm),
        Direction::EvmToCosmos => (evm, cosmos),
    };

    let escrow = config.conversion_module.as_str();
    let in_place = holder.is_module(escrow);

    if !in_place {
        holder.send_to_module(bank, escrow, &source)?;
    }
    bank.burn_coins(escrow, &source)?;
    bank.mint_coins(escrow, &target)?;
    if !in_place {
        holder.receive_from_module(bank, escrow, &target)?;
    }

    tracing::debug!(
        holder = %holder,
        units = %units,
        direction = direction.as_str(),
        escrow = escrow,
        "Converted settlement units"
    );

    Ok(())
}

/// Make sure `holder` has at least `required` spendable evm units, converting
/// the fewest whole settlement units that cover the shortfall.
///
/// Returns the number of settlement units converted. For any remainder-sized
/// request (`required < multiplier`) this is at most one.
pub fn ensure_evm_available<B: BankKeeper + ?Sized>(
    bank: &mut B,
    config: &BridgeConfig,
    holder: &Holder,
    required: Uint128,
) -> Result<Uint128, BridgeError> {
    if required.is_zero() {
        return Ok(Uint128::zero());
    }

    let addr = holder.address(&*bank)?;
    let available = bank.spendable_amount(&addr, &config.evm_denom)?;
    if available >= required {
        return Ok(Uint128::zero());
    }

    let shortfall = required - available;
    let units = shortfall
        .checked_add(config.multiplier.checked_sub(Uint128::one())?)?
        .checked_div(config.multiplier)
        .map_err(|e| BridgeError::InvariantViolation {
            reason: e.to_string(),
        })?;

    convert(bank, config, holder, units, Direction::CosmosToEvm)?;
    Ok(units)
}

/// Fold whole units of evm dust held by `holder` back into settlement units.
///
/// Returns the number of settlement units produced; zero (and no ledger
/// mutation) when the dust is already below one unit.
pub fn sweep_dust<B: BankKeeper + ?Sized>(
    bank: &mut B,
    config: &BridgeConfig,
    holder: &Holder,
) -> Result<Uint128, BridgeError> {
    let addr = holder.address(&*bank)?;
    let dust = bank.spendable_amount(&addr, &config.evm_denom)?;
    let units = dust
        .checked_div(config.multiplier)
        .map_err(|e| BridgeError::InvariantViolation {
            reason: e.to_string(),
        })?;

    if units.is_zero() {
        return Ok(Uint128::zero());
    }

    convert(bank, config, holder, units, Direction::EvmToCosmos)?;
    tracing::debug!(holder = %holder, units = %units, "Swept evm dust");
    Ok(units)
}
