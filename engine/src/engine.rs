//! Attestation engine: validates operations, pairs record mutations with bond
//! movements, and emits facts.

use crate::error::{AttestationError, DisputeRejection};
use crate::event::AttestationEvent;
use attest_registry::Registry;
use attest_stake::{BondEscrow, BondLedger};
use attest_store::{AttestationRecord, AttestationStore, RecordState};
use attest_types::{
    AlgorithmRef, Identity, Score, StakeAmount, Timestamp, CHALLENGE_WINDOW_SECS, REQUIRED_STAKE,
};
use tracing::{debug, error, info, warn};

/// The attestation state machine.
///
/// Methods take `&mut self`; callers that share an engine across threads wrap
/// it in a single lock so that operations apply in one total order.
pub struct AttestationEngine<S, L> {
    store: S,
    ledger: L,
    registry: Registry,
    escrow: BondEscrow,
    /// Facts from successful operations, in application order.
    pending_events: Vec<AttestationEvent>,
}

impl<S: AttestationStore, L: BondLedger> AttestationEngine<S, L> {
    /// Create an engine with empty in-memory allowlists administered by `admin`.
    pub fn new(admin: Identity, store: S, ledger: L) -> Self {
        Self::with_registry(Registry::new(admin), store, ledger)
    }

    pub fn with_registry(registry: Registry, store: S, ledger: L) -> Self {
        Self {
            store,
            ledger,
            registry,
            escrow: BondEscrow::new(REQUIRED_STAKE),
            pending_events: Vec::new(),
        }
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Post a scored claim backed by `stake`.
    ///
    /// Returns the finalization time, `now + CHALLENGE_WINDOW_SECS`.
    pub fn submit(
        &mut self,
        caller: &Identity,
        score: u64,
        algorithm: &AlgorithmRef,
        observed_at: Timestamp,
        stake: StakeAmount,
        now: Timestamp,
    ) -> Result<Timestamp, AttestationError> {
        let score = Score::new(score).map_err(|_| AttestationError::InvalidScore {
            min: Score::MIN,
            max: Score::MAX,
            given: score,
        })?;
        if !self.registry.is_algorithm_approved(algorithm) {
            return Err(AttestationError::InvalidAlgorithm(algorithm.to_string()));
        }
        if let Some(existing) = self.store.get_record(caller)? {
            if existing.is_outstanding() {
                return Err(AttestationError::OutstandingRecord(caller.to_string()));
            }
        }
        self.escrow.verify_exact(stake)?;

        let finalization_time = now
            .checked_add_secs(CHALLENGE_WINDOW_SECS)
            .ok_or(AttestationError::ClockOverflow)?;
        let record = AttestationRecord {
            score,
            algorithm: algorithm.clone(),
            submitted_at: now,
            observed_at,
            finalization_time,
            settled: false,
        };

        self.escrow.lock(&mut self.ledger, caller, stake)?;
        if let Err(e) = self.store.put_record(caller, &record) {
            warn!(%caller, error = %e, "record write failed, refunding bond");
            if let Err(refund) = self.escrow.release(&mut self.ledger, caller) {
                error!(%caller, error = %refund, "refund after failed record write also failed");
            }
            return Err(e.into());
        }

        info!(%caller, %score, %algorithm, %finalization_time, "attestation submitted");
        self.pending_events.push(AttestationEvent::Submitted {
            identity: caller.clone(),
            score,
            algorithm: algorithm.clone(),
            observed_at,
        });
        Ok(finalization_time)
    }

    /// Invalidate `claimant`'s record and send its bond to `reward_recipient`.
    pub fn dispute(
        &mut self,
        caller: &Identity,
        claimant: &Identity,
        asserted_score: u64,
        algorithm: &AlgorithmRef,
        reward_recipient: &Identity,
    ) -> Result<(), AttestationError> {
        self.registry.authorize_verifier(caller)?;

        let record = self
            .store
            .get_record(claimant)?
            .ok_or(AttestationError::InvalidDispute(DisputeRejection::NoRecord))?;
        if record.settled {
            return Err(AttestationError::DisputeDenied(claimant.to_string()));
        }
        if record.algorithm != *algorithm {
            return Err(AttestationError::InvalidDispute(
                DisputeRejection::AlgorithmMismatch {
                    stored: record.algorithm.to_string(),
                    given: algorithm.to_string(),
                },
            ));
        }
        if record.score.matches(asserted_score) {
            return Err(AttestationError::InvalidDispute(
                DisputeRejection::ScoreMatches(asserted_score),
            ));
        }

        self.store.delete_record(claimant)?;
        if let Err(e) = self.escrow.release(&mut self.ledger, reward_recipient) {
            warn!(%claimant, recipient = %reward_recipient, error = %e, "dispute payout failed, restoring record");
            if let Err(restore) = self.store.put_record(claimant, &record) {
                error!(%claimant, error = %restore, "restoring record after failed dispute payout also failed");
            }
            return Err(e.into());
        }

        info!(
            %claimant,
            verifier = %caller,
            original = %record.score,
            asserted = asserted_score,
            "attestation disputed"
        );
        self.pending_events.push(AttestationEvent::Disputed {
            claimant: claimant.clone(),
            verifier: caller.clone(),
            original_score: record.score,
            asserted_score,
            algorithm: record.algorithm,
        });
        Ok(())
    }

    /// Reclaim the caller's bond once the challenge window has closed.
    pub fn withdraw(
        &mut self,
        caller: &Identity,
        now: Timestamp,
    ) -> Result<StakeAmount, AttestationError> {
        let record = match self.store.get_record(caller)? {
            Some(r) if r.is_outstanding() => r,
            _ => return Err(AttestationError::InvalidWithdraw(caller.to_string())),
        };
        if !record.is_finalized(now) {
            let remaining_secs = record.finalization_time.remaining_from(now);
            debug!(%caller, remaining_secs, "withdraw before finalization");
            return Err(AttestationError::WithdrawNotReady { remaining_secs });
        }

        let settled = AttestationRecord {
            settled: true,
            ..record.clone()
        };
        self.store.put_record(caller, &settled)?;
        let amount = match self.escrow.release(&mut self.ledger, caller) {
            Ok(amount) => amount,
            Err(e) => {
                warn!(%caller, error = %e, "withdraw payout failed, restoring record");
                if let Err(restore) = self.store.put_record(caller, &record) {
                    error!(%caller, error = %restore, "restoring record after failed withdraw payout also failed");
                }
                return Err(e.into());
            }
        };

        info!(%caller, %amount, "bond withdrawn");
        self.pending_events.push(AttestationEvent::Withdrawn {
            identity: caller.clone(),
            amount,
        });
        Ok(amount)
    }

    /// Approve an algorithm. Returns `false` (and emits nothing) if it was
    /// already approved.
    pub fn add_algorithm(
        &mut self,
        caller: &Identity,
        algorithm: AlgorithmRef,
    ) -> Result<bool, AttestationError> {
        let added = self.registry.add_algorithm(caller, algorithm.clone())?;
        if added {
            self.pending_events
                .push(AttestationEvent::AlgorithmApproved { algorithm });
        }
        Ok(added)
    }

    /// Approve a verifier. Returns `false` (and emits nothing) if it was
    /// already approved.
    pub fn add_verifier(
        &mut self,
        caller: &Identity,
        verifier: Identity,
    ) -> Result<bool, AttestationError> {
        let added = self.registry.add_verifier(caller, verifier.clone())?;
        if added {
            self.pending_events
                .push(AttestationEvent::VerifierApproved { verifier });
        }
        Ok(added)
    }

    pub fn transfer_admin(
        &mut self,
        caller: &Identity,
        new_admin: Identity,
    ) -> Result<(), AttestationError> {
        let previous = self.registry.transfer_admin(caller, new_admin.clone())?;
        self.pending_events.push(AttestationEvent::AdminTransferred {
            previous,
            new: new_admin,
        });
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn record(&self, identity: &Identity) -> Result<Option<AttestationRecord>, AttestationError> {
        Ok(self.store.get_record(identity)?)
    }

    pub fn state_of(&self, identity: &Identity) -> Result<RecordState, AttestationError> {
        Ok(RecordState::of(self.store.get_record(identity)?.as_ref()))
    }

    /// Seconds left in `identity`'s challenge window, or `None` if there is no
    /// outstanding record.
    pub fn remaining_window(
        &self,
        identity: &Identity,
        now: Timestamp,
    ) -> Result<Option<u64>, AttestationError> {
        Ok(self
            .store
            .get_record(identity)?
            .filter(AttestationRecord::is_outstanding)
            .map(|r| r.finalization_time.remaining_from(now)))
    }

    pub fn is_algorithm_approved(&self, algorithm: &AlgorithmRef) -> bool {
        self.registry.is_algorithm_approved(algorithm)
    }

    pub fn is_verifier(&self, identity: &Identity) -> bool {
        self.registry.is_verifier(identity)
    }

    pub fn admin(&self) -> &Identity {
        self.registry.admin()
    }

    pub fn pooled_bonds(&self) -> StakeAmount {
        self.ledger.pooled()
    }

    pub fn outstanding_count(&self) -> Result<u64, AttestationError> {
        Ok(self.store.outstanding_count()?)
    }

    /// Whether the pool holds exactly one bond per outstanding record.
    pub fn bonds_balanced(&self) -> Result<bool, AttestationError> {
        let outstanding = self.store.outstanding_count()?;
        Ok(self.escrow.expected_pool(outstanding) == Some(self.ledger.pooled()))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable ledger access for deposits from outside the protocol.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take all facts emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<AttestationEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_stake::InMemoryLedger;
    use attest_store::MemoryStore;

    type Engine = AttestationEngine<MemoryStore, InMemoryLedger>;

    fn admin() -> Identity {
        Identity::from("admin")
    }

    fn alice() -> Identity {
        Identity::from("alice")
    }

    fn verifier() -> Identity {
        Identity::from("verifier")
    }

    fn cid() -> AlgorithmRef {
        AlgorithmRef::from("CID-1")
    }

    fn setup() -> Engine {
        let mut engine = Engine::new(admin(), MemoryStore::new(), InMemoryLedger::new());
        engine.add_algorithm(&admin(), cid()).unwrap();
        engine.add_verifier(&admin(), verifier()).unwrap();
        let funding = REQUIRED_STAKE.checked_mul(10).unwrap();
        engine.ledger_mut().credit(&alice(), funding).unwrap();
        engine.drain_events();
        engine
    }

    fn submit(engine: &mut Engine, score: u64, now: u64) -> Result<Timestamp, AttestationError> {
        engine.submit(
            &alice(),
            score,
            &cid(),
            Timestamp::new(now),
            REQUIRED_STAKE,
            Timestamp::new(now),
        )
    }

    #[test]
    fn submit_returns_window_end_and_escrows_bond() {
        let mut engine = setup();
        let fin = submit(&mut engine, 50, 1_000).unwrap();
        assert_eq!(fin, Timestamp::new(1_000 + CHALLENGE_WINDOW_SECS));
        assert_eq!(engine.pooled_bonds(), REQUIRED_STAKE);
        assert_eq!(engine.state_of(&alice()).unwrap(), RecordState::Pending);
        assert!(engine.bonds_balanced().unwrap());
    }

    #[test]
    fn submit_checks_score_before_algorithm() {
        let mut engine = setup();
        let err = engine
            .submit(
                &alice(),
                101,
                &AlgorithmRef::from("unknown"),
                Timestamp::new(0),
                REQUIRED_STAKE,
                Timestamp::new(0),
            )
            .unwrap_err();
        assert_eq!(
            err,
            AttestationError::InvalidScore {
                min: 0,
                max: 100,
                given: 101
            }
        );
    }

    #[test]
    fn submit_rejects_unknown_algorithm() {
        let mut engine = setup();
        let err = engine
            .submit(
                &alice(),
                50,
                &AlgorithmRef::from("CID-2"),
                Timestamp::new(0),
                REQUIRED_STAKE,
                Timestamp::new(0),
            )
            .unwrap_err();
        assert_eq!(err, AttestationError::InvalidAlgorithm("CID-2".into()));
        assert_eq!(engine.pooled_bonds(), StakeAmount::ZERO);
    }

    #[test]
    fn outstanding_is_checked_before_stake() {
        let mut engine = setup();
        submit(&mut engine, 50, 0).unwrap();
        let err = engine
            .submit(
                &alice(),
                50,
                &cid(),
                Timestamp::new(0),
                StakeAmount::new(1),
                Timestamp::new(1),
            )
            .unwrap_err();
        assert_eq!(err, AttestationError::OutstandingRecord("alice".into()));
    }

    #[test]
    fn overpayment_is_rejected() {
        let mut engine = setup();
        let over = REQUIRED_STAKE.checked_add(StakeAmount::new(1)).unwrap();
        let err = engine
            .submit(&alice(), 50, &cid(), Timestamp::new(0), over, Timestamp::new(0))
            .unwrap_err();
        assert_eq!(
            err,
            AttestationError::IncorrectStake {
                expected: REQUIRED_STAKE.raw(),
                given: over.raw()
            }
        );
        assert_eq!(engine.state_of(&alice()).unwrap(), RecordState::Absent);
    }

    #[test]
    fn unfunded_claimant_gets_transfer_error_and_no_record() {
        let mut engine = setup();
        let bob = Identity::from("bob");
        let err = engine
            .submit(&bob, 50, &cid(), Timestamp::new(0), REQUIRED_STAKE, Timestamp::new(0))
            .unwrap_err();
        assert_eq!(err.kind(), "transfer_failed");
        assert_eq!(engine.state_of(&bob).unwrap(), RecordState::Absent);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn withdraw_at_exact_deadline_succeeds() {
        let mut engine = setup();
        let fin = submit(&mut engine, 50, 10).unwrap();
        let before = engine.ledger().balance_of(&alice());
        assert_eq!(engine.withdraw(&alice(), fin).unwrap(), REQUIRED_STAKE);
        assert_eq!(
            engine.ledger().balance_of(&alice()),
            before.checked_add(REQUIRED_STAKE).unwrap()
        );
        assert_eq!(engine.state_of(&alice()).unwrap(), RecordState::Settled);
        assert_eq!(engine.pooled_bonds(), StakeAmount::ZERO);
    }

    #[test]
    fn withdraw_reports_remaining_window() {
        let mut engine = setup();
        submit(&mut engine, 50, 10).unwrap();
        let err = engine.withdraw(&alice(), Timestamp::new(110)).unwrap_err();
        assert_eq!(
            err,
            AttestationError::WithdrawNotReady {
                remaining_secs: CHALLENGE_WINDOW_SECS - 100
            }
        );
        assert_eq!(
            engine.remaining_window(&alice(), Timestamp::new(110)).unwrap(),
            Some(CHALLENGE_WINDOW_SECS - 100)
        );
    }

    #[test]
    fn withdraw_without_record_is_invalid() {
        let mut engine = setup();
        assert_eq!(
            engine.withdraw(&alice(), Timestamp::new(0)).unwrap_err(),
            AttestationError::InvalidWithdraw("alice".into())
        );
    }

    #[test]
    fn dispute_requires_different_score() {
        let mut engine = setup();
        submit(&mut engine, 50, 0).unwrap();
        let err = engine
            .dispute(&verifier(), &alice(), 50, &cid(), &verifier())
            .unwrap_err();
        assert_eq!(
            err,
            AttestationError::InvalidDispute(DisputeRejection::ScoreMatches(50))
        );
        assert_eq!(engine.state_of(&alice()).unwrap(), RecordState::Pending);
    }

    #[test]
    fn dispute_deletes_record_and_pays_recipient() {
        let mut engine = setup();
        submit(&mut engine, 50, 0).unwrap();
        engine
            .dispute(&verifier(), &alice(), 10, &cid(), &verifier())
            .unwrap();
        assert_eq!(engine.state_of(&alice()).unwrap(), RecordState::Absent);
        assert_eq!(engine.ledger().balance_of(&verifier()), REQUIRED_STAKE);
    }

    #[test]
    fn admin_cannot_dispute_without_verifier_membership() {
        let mut engine = setup();
        submit(&mut engine, 50, 0).unwrap();
        let err = engine
            .dispute(&admin(), &alice(), 10, &cid(), &admin())
            .unwrap_err();
        assert_eq!(err.kind(), "unauthorized");
    }

    #[test]
    fn duplicate_registry_add_emits_nothing() {
        let mut engine = setup();
        assert!(!engine.add_algorithm(&admin(), cid()).unwrap());
        assert!(!engine.add_verifier(&admin(), verifier()).unwrap());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn transfer_admin_emits_fact() {
        let mut engine = setup();
        engine
            .transfer_admin(&admin(), Identity::from("ops"))
            .unwrap();
        assert_eq!(engine.admin(), &Identity::from("ops"));
        assert_eq!(
            engine.drain_events(),
            vec![AttestationEvent::AdminTransferred {
                previous: admin(),
                new: Identity::from("ops"),
            }]
        );
    }
}
