//! Nullable ledger: an in-memory bond ledger with injectable payout failures.

use attest_stake::{BondLedger, InMemoryLedger, LedgerError};
use attest_types::{Identity, StakeAmount};
use std::collections::HashSet;

/// Wraps [`InMemoryLedger`] and refuses selected payouts, modelling a
/// recipient that cannot accept funds.
#[derive(Default)]
pub struct NullLedger {
    inner: InMemoryLedger,
    rejecting: HashSet<Identity>,
    fail_next_payout: bool,
    payouts: usize,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every payout to `recipient` until [`NullLedger::accept_payouts_to`].
    pub fn reject_payouts_to(&mut self, recipient: Identity) {
        self.rejecting.insert(recipient);
    }

    pub fn accept_payouts_to(&mut self, recipient: &Identity) {
        self.rejecting.remove(recipient);
    }

    /// Refuse the next payout, whoever receives it.
    pub fn fail_next_payout(&mut self) {
        self.fail_next_payout = true;
    }

    /// Number of payouts that completed.
    pub fn payout_count(&self) -> usize {
        self.payouts
    }

    pub fn total_supply(&self) -> Option<StakeAmount> {
        self.inner.total_supply()
    }
}

impl BondLedger for NullLedger {
    fn credit(&mut self, to: &Identity, amount: StakeAmount) -> Result<(), LedgerError> {
        self.inner.credit(to, amount)
    }

    fn collect(&mut self, from: &Identity, amount: StakeAmount) -> Result<(), LedgerError> {
        self.inner.collect(from, amount)
    }

    fn pay_out(&mut self, to: &Identity, amount: StakeAmount) -> Result<(), LedgerError> {
        if std::mem::take(&mut self.fail_next_payout) || self.rejecting.contains(to) {
            return Err(LedgerError::Rejected {
                recipient: to.to_string(),
                reason: "recipient refused funds".into(),
            });
        }
        self.inner.pay_out(to, amount)?;
        self.payouts += 1;
        Ok(())
    }

    fn balance_of(&self, who: &Identity) -> StakeAmount {
        self.inner.balance_of(who)
    }

    fn pooled(&self) -> StakeAmount {
        self.inner.pooled()
    }
}
