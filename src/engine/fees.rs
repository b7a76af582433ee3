//! Relayer fee and fee split parameters.
//!
//! The relayer fee is `fee_numerator / fee_denominator` of every filled
//! amount, charged in the source token. A `fee_split_numerator / 10000`
//! share of that fee is converted into the fee token and sent to the
//! fee-split recipient; the rest stays with the relayer.

use alloy_primitives::{Address, U256};

use crate::error::{Error, Result};
use crate::types::amount::{self, FEE_SPLIT_DENOMINATOR};

/// Default relayer fee numerator (0.2%)
pub const DEFAULT_FEE_NUMERATOR: u64 = 2;

/// Default relayer fee denominator
pub const DEFAULT_FEE_DENOMINATOR: u64 = 1000;

/// Largest fee split numerator (half of the fee)
pub const MAX_FEE_SPLIT_NUMERATOR: u64 = 5_000;

/// Largest fee, in percent of the filled amount
pub const MAX_FEE_PERCENT: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeConfig {
    pub fee_numerator: u64,
    pub fee_denominator: u64,

    /// Share of the fee routed to `fee_split_recipient`, out of 10000
    pub fee_split_numerator: u64,

    /// Receives the fee split; no split is taken while unset
    pub fee_split_recipient: Option<Address>,

    /// Token the fee split is converted into; the source token when unset
    pub fee_token: Option<Address>,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            fee_numerator: DEFAULT_FEE_NUMERATOR,
            fee_denominator: DEFAULT_FEE_DENOMINATOR,
            fee_split_numerator: 0,
            fee_split_recipient: None,
            fee_token: None,
        }
    }
}

impl FeeConfig {
    /// Fee of `numerator / denominator` with no split
    pub fn new(fee_numerator: u64, fee_denominator: u64) -> Result<Self> {
        check_fee(fee_numerator, fee_denominator)?;
        Ok(Self {
            fee_numerator,
            fee_denominator,
            ..Self::default()
        })
    }

    /// Route `fee_split_numerator / 10000` of every fee to `recipient`,
    /// converted into `fee_token`
    pub fn with_split(
        mut self,
        fee_split_numerator: u64,
        recipient: Address,
        fee_token: Option<Address>,
    ) -> Result<Self> {
        check_fee_split(fee_split_numerator)?;
        self.fee_split_numerator = fee_split_numerator;
        self.fee_split_recipient = Some(recipient);
        self.fee_token = fee_token;
        Ok(self)
    }

    /// Check both bounds
    pub fn validate(&self) -> Result<()> {
        check_fee(self.fee_numerator, self.fee_denominator)?;
        check_fee_split(self.fee_split_numerator)
    }

    /// Fee charged on `amount`
    pub fn fee_of(&self, amount: U256) -> Result<U256> {
        amount::fee_of(amount, self.fee_numerator, self.fee_denominator)
    }

    /// Part of `fee` owed to the fee-split recipient; zero while no
    /// recipient is set
    pub fn split_of(&self, fee: U256) -> Result<U256> {
        if self.fee_split_recipient.is_none() {
            return Ok(U256::ZERO);
        }
        amount::split_of(fee, self.fee_split_numerator)
    }
}

/// `FeeTooHigh` unless `numerator / denominator` is at most 1%
pub fn check_fee(fee_numerator: u64, fee_denominator: u64) -> Result<()> {
    if fee_denominator == 0 {
        return Err(Error::FeeTooHigh);
    }
    let scaled = u128::from(fee_numerator) * 100;
    if scaled > u128::from(fee_denominator) * u128::from(MAX_FEE_PERCENT) {
        return Err(Error::FeeTooHigh);
    }
    Ok(())
}

/// `FeeSplitTooHigh` above half of the fee
pub fn check_fee_split(fee_split_numerator: u64) -> Result<()> {
    if fee_split_numerator > MAX_FEE_SPLIT_NUMERATOR || fee_split_numerator > FEE_SPLIT_DENOMINATOR
    {
        return Err(Error::FeeSplitTooHigh);
    }
    Ok(())
}
