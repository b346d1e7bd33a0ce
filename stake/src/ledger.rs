//! Bond custody: spendable balances plus a single pool of escrowed bonds.

use crate::error::LedgerError;
use attest_types::{Identity, StakeAmount};
use std::collections::HashMap;

/// Custody backend for bonds.
///
/// `collect` and `pay_out` are the only operations that move value into and
/// out of the pool. Each either completes in full or leaves every balance
/// untouched.
pub trait BondLedger {
    /// Credit an identity's spendable balance from outside the protocol
    /// (deposit, bridge, faucet).
    fn credit(&mut self, to: &Identity, amount: StakeAmount) -> Result<(), LedgerError>;

    /// Move `amount` from `from`'s spendable balance into the pool.
    fn collect(&mut self, from: &Identity, amount: StakeAmount) -> Result<(), LedgerError>;

    /// Move `amount` from the pool to `to`'s spendable balance.
    fn pay_out(&mut self, to: &Identity, amount: StakeAmount) -> Result<(), LedgerError>;

    fn balance_of(&self, who: &Identity) -> StakeAmount;

    /// Total value currently escrowed.
    fn pooled(&self) -> StakeAmount;
}

/// A `HashMap`-backed ledger.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Identity, StakeAmount>,
    pool: StakeAmount,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of every spendable balance plus the pool.
    pub fn total_supply(&self) -> Option<StakeAmount> {
        self.balances
            .values()
            .try_fold(self.pool, |acc, b| acc.checked_add(*b))
    }
}

impl BondLedger for InMemoryLedger {
    fn credit(&mut self, to: &Identity, amount: StakeAmount) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let current = self.balance_of(to);
        let updated = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.balances.insert(to.clone(), updated);
        Ok(())
    }

    fn collect(&mut self, from: &Identity, amount: StakeAmount) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                needed: amount.raw(),
                available: available.raw(),
            })?;
        let pool = self.pool.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.balances.insert(from.clone(), remaining);
        self.pool = pool;
        Ok(())
    }

    fn pay_out(&mut self, to: &Identity, amount: StakeAmount) -> Result<(), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let pool = self
            .pool
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientPool {
                needed: amount.raw(),
                available: self.pool.raw(),
            })?;
        let updated = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.pool = pool;
        self.balances.insert(to.clone(), updated);
        Ok(())
    }

    fn balance_of(&self, who: &Identity) -> StakeAmount {
        self.balances.get(who).copied().unwrap_or(StakeAmount::ZERO)
    }

    fn pooled(&self) -> StakeAmount {
        self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity::from("alice")
    }

    #[test]
    fn collect_moves_balance_into_pool() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(&alice(), StakeAmount::new(100)).unwrap();
        ledger.collect(&alice(), StakeAmount::new(40)).unwrap();
        assert_eq!(ledger.balance_of(&alice()), StakeAmount::new(60));
        assert_eq!(ledger.pooled(), StakeAmount::new(40));
    }

    #[test]
    fn collect_without_funds_changes_nothing() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(&alice(), StakeAmount::new(10)).unwrap();
        let err = ledger.collect(&alice(), StakeAmount::new(11)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                needed: 11,
                available: 10
            }
        );
        assert_eq!(ledger.balance_of(&alice()), StakeAmount::new(10));
        assert_eq!(ledger.pooled(), StakeAmount::ZERO);
    }

    #[test]
    fn pay_out_cannot_exceed_pool() {
        let mut ledger = InMemoryLedger::new();
        let err = ledger.pay_out(&alice(), StakeAmount::new(1)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientPool { .. }));
        assert_eq!(ledger.balance_of(&alice()), StakeAmount::ZERO);
    }

    #[test]
    fn zero_amounts_rejected() {
        let mut ledger = InMemoryLedger::new();
        assert_eq!(
            ledger.credit(&alice(), StakeAmount::ZERO),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            ledger.collect(&alice(), StakeAmount::ZERO),
            Err(LedgerError::ZeroAmount)
        );
    }

    #[test]
    fn credit_overflow_is_reported() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(&alice(), StakeAmount::new(u128::MAX)).unwrap();
        assert_eq!(
            ledger.credit(&alice(), StakeAmount::new(1)),
            Err(LedgerError::Overflow)
        );
    }
}
