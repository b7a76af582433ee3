//! Multi-token balance sheet.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::env::LedgerError;

/// Balances and allowances of every token.
///
/// An allowance of `U256::MAX` is never decreased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    /// (token, account) -> balance
    balances: HashMap<(Address, Address), U256>,

    /// (token, owner, spender) -> allowance
    allowances: HashMap<(Address, Address, Address), U256>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, token: Address, account: Address) -> U256 {
        self.balances
            .get(&(token, account))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Credit `amount` of newly issued `token` to `to`
    pub fn mint(&mut self, token: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let balance = self.balance_of(token, to);
        let credited = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.balances.insert((token, to), credited);
        Ok(())
    }

    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(token, from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(token, to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.balances.insert((token, from), from_balance - amount);
        self.balances.insert((token, to), to_balance);
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let allowance = self.allowance(token, from, spender);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance);
        }
        self.transfer(token, from, to, amount)?;
        if allowance != U256::MAX {
            self.approve(token, from, spender, allowance - amount);
        }
        Ok(())
    }
}
