//! Bond escrow policy: exact-amount enforcement and paired bond movements.

use crate::error::StakeError;
use crate::ledger::BondLedger;
use attest_types::{Identity, StakeAmount};
use tracing::trace;

/// Fixed-size bond policy over a [`BondLedger`].
///
/// Overpayment is rejected as firmly as underpayment: nothing but the exact
/// bond is ever held against a record.
#[derive(Clone, Copy, Debug)]
pub struct BondEscrow {
    required: StakeAmount,
}

impl BondEscrow {
    pub fn new(required: StakeAmount) -> Self {
        Self { required }
    }

    pub fn required(&self) -> StakeAmount {
        self.required
    }

    /// Reject any amount other than the required bond.
    pub fn verify_exact(&self, given: StakeAmount) -> Result<(), StakeError> {
        if given != self.required {
            return Err(StakeError::IncorrectStake {
                expected: self.required.raw(),
                given: given.raw(),
            });
        }
        Ok(())
    }

    /// Verify `given` and move the bond from `from` into the pool.
    pub fn lock<L: BondLedger + ?Sized>(
        &self,
        ledger: &mut L,
        from: &Identity,
        given: StakeAmount,
    ) -> Result<(), StakeError> {
        self.verify_exact(given)?;
        ledger.collect(from, self.required)?;
        trace!(%from, amount = %self.required, "bond locked");
        Ok(())
    }

    /// Move one bond out of the pool to `to`.
    ///
    /// Used both for refunds to the claimant and for forfeits to a dispute's
    /// reward recipient.
    pub fn release<L: BondLedger + ?Sized>(
        &self,
        ledger: &mut L,
        to: &Identity,
    ) -> Result<StakeAmount, StakeError> {
        ledger.pay_out(to, self.required)?;
        trace!(%to, amount = %self.required, "bond released");
        Ok(self.required)
    }

    /// Pool balance implied by `outstanding` live records.
    pub fn expected_pool(&self, outstanding: u64) -> Option<StakeAmount> {
        self.required.checked_mul(u128::from(outstanding))
    }
}
