//! End-to-end lifecycle scenarios against the engine, including rollback of
//! failed bond transfers.

use attest_engine::{AttestationEngine, AttestationError, AttestationEvent, DisputeRejection};
use attest_nullables::{NullClock, NullLedger, NullStore};
use attest_stake::BondLedger;
use attest_store::RecordState;
use attest_types::{
    AlgorithmRef, Clock, Identity, Score, StakeAmount, Timestamp, CHALLENGE_WINDOW_SECS,
    REQUIRED_STAKE,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

type Engine = AttestationEngine<NullStore, NullLedger>;

fn admin() -> Identity {
    Identity::from("admin")
}

fn claimant() -> Identity {
    Identity::from("claimant")
}

fn verifier() -> Identity {
    Identity::from("verifier")
}

fn cid1() -> AlgorithmRef {
    AlgorithmRef::from("CID-1")
}

fn setup() -> Engine {
    let mut engine = Engine::new(admin(), NullStore::new(), NullLedger::new());
    engine.add_algorithm(&admin(), cid1()).unwrap();
    engine.add_verifier(&admin(), verifier()).unwrap();
    engine
        .ledger_mut()
        .credit(&claimant(), REQUIRED_STAKE.checked_mul(5).unwrap())
        .unwrap();
    engine.drain_events();
    engine
}

fn submit_50(engine: &mut Engine, clock: &NullClock) -> Result<Timestamp, AttestationError> {
    engine.submit(
        &claimant(),
        50,
        &cid1(),
        Timestamp::new(7),
        REQUIRED_STAKE,
        clock.now(),
    )
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_submit_then_duplicate() {
    let clock = NullClock::new(1_000);
    let mut engine = setup();

    submit_50(&mut engine, &clock).unwrap();
    assert_eq!(
        engine.drain_events(),
        vec![AttestationEvent::Submitted {
            identity: claimant(),
            score: Score::new(50).unwrap(),
            algorithm: cid1(),
            observed_at: Timestamp::new(7),
        }]
    );

    let err = submit_50(&mut engine, &clock).unwrap_err();
    assert_eq!(err, AttestationError::OutstandingRecord("claimant".into()));
    assert!(engine.drain_events().is_empty());
    assert_eq!(engine.pooled_bonds(), REQUIRED_STAKE);
}

#[test]
fn scenario_b_dispute_moves_bond_to_verifier() {
    let clock = NullClock::new(1_000);
    let mut engine = setup();
    submit_50(&mut engine, &clock).unwrap();
    engine.drain_events();

    engine
        .dispute(&verifier(), &claimant(), 69, &cid1(), &verifier())
        .unwrap();

    assert_eq!(engine.record(&claimant()).unwrap(), None);
    assert_eq!(engine.ledger().balance_of(&verifier()), REQUIRED_STAKE);
    assert_eq!(engine.pooled_bonds(), StakeAmount::ZERO);
    assert_eq!(
        engine.drain_events(),
        vec![AttestationEvent::Disputed {
            claimant: claimant(),
            verifier: verifier(),
            original_score: Score::new(50).unwrap(),
            asserted_score: 69,
            algorithm: cid1(),
        }]
    );

    // The identity is free again immediately.
    submit_50(&mut engine, &clock).unwrap();
}

#[test]
fn scenario_c_withdraw_then_stale_dispute_denied() {
    let clock = NullClock::new(1_000);
    let mut engine = setup();
    let fin = submit_50(&mut engine, &clock).unwrap();
    engine.drain_events();
    let before = engine.ledger().balance_of(&claimant());

    clock.set(fin.as_secs());
    let amount = engine.withdraw(&claimant(), clock.now()).unwrap();
    assert_eq!(amount, REQUIRED_STAKE);
    assert_eq!(
        engine.ledger().balance_of(&claimant()),
        before.checked_add(REQUIRED_STAKE).unwrap()
    );
    assert_eq!(
        engine.drain_events(),
        vec![AttestationEvent::Withdrawn {
            identity: claimant(),
            amount: REQUIRED_STAKE,
        }]
    );

    let err = engine
        .dispute(&verifier(), &claimant(), 69, &cid1(), &verifier())
        .unwrap_err();
    assert_eq!(err, AttestationError::DisputeDenied("claimant".into()));

    let err = engine.withdraw(&claimant(), clock.now()).unwrap_err();
    assert_eq!(err, AttestationError::InvalidWithdraw("claimant".into()));
}

#[test]
fn settled_identity_can_submit_again() {
    let clock = NullClock::new(0);
    let mut engine = setup();
    let fin = submit_50(&mut engine, &clock).unwrap();
    clock.set(fin.as_secs());
    engine.withdraw(&claimant(), clock.now()).unwrap();
    assert_eq!(engine.state_of(&claimant()).unwrap(), RecordState::Settled);

    let fin2 = submit_50(&mut engine, &clock).unwrap();
    assert_eq!(fin2.as_secs(), clock.now().as_secs() + CHALLENGE_WINDOW_SECS);
    assert_eq!(engine.state_of(&claimant()).unwrap(), RecordState::Pending);
}

#[test]
fn dispute_rejections_in_order() {
    let clock = NullClock::new(0);
    let mut engine = setup();

    // Unauthorized beats everything, even with no record.
    let err = engine
        .dispute(&claimant(), &claimant(), 1, &cid1(), &claimant())
        .unwrap_err();
    assert_eq!(err.kind(), "unauthorized");

    let err = engine
        .dispute(&verifier(), &claimant(), 1, &cid1(), &verifier())
        .unwrap_err();
    assert_eq!(
        err,
        AttestationError::InvalidDispute(DisputeRejection::NoRecord)
    );

    submit_50(&mut engine, &clock).unwrap();
    let err = engine
        .dispute(&verifier(), &claimant(), 1, &AlgorithmRef::from("CID-2"), &verifier())
        .unwrap_err();
    assert!(matches!(
        err,
        AttestationError::InvalidDispute(DisputeRejection::AlgorithmMismatch { .. })
    ));
    assert_eq!(engine.state_of(&claimant()).unwrap(), RecordState::Pending);
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

#[test]
fn failed_dispute_payout_restores_record() {
    let clock = NullClock::new(0);
    let mut engine = setup();
    submit_50(&mut engine, &clock).unwrap();
    let before = engine.record(&claimant()).unwrap();
    engine.drain_events();

    let sink = Identity::from("sink");
    engine.ledger_mut().reject_payouts_to(sink.clone());
    let err = engine
        .dispute(&verifier(), &claimant(), 69, &cid1(), &sink)
        .unwrap_err();

    assert_eq!(err.kind(), "transfer_failed");
    assert_eq!(engine.record(&claimant()).unwrap(), before);
    assert_eq!(engine.pooled_bonds(), REQUIRED_STAKE);
    assert!(engine.drain_events().is_empty());
    assert!(engine.bonds_balanced().unwrap());

    // A retry to a working recipient goes through.
    engine
        .dispute(&verifier(), &claimant(), 69, &cid1(), &verifier())
        .unwrap();
    assert!(engine.bonds_balanced().unwrap());
}

#[test]
fn failed_withdraw_payout_keeps_record_unsettled() {
    let clock = NullClock::new(0);
    let mut engine = setup();
    let fin = submit_50(&mut engine, &clock).unwrap();
    clock.set(fin.as_secs() + 1);
    engine.drain_events();

    engine.ledger_mut().fail_next_payout();
    let err = engine.withdraw(&claimant(), clock.now()).unwrap_err();
    assert_eq!(err.kind(), "transfer_failed");
    assert_eq!(engine.state_of(&claimant()).unwrap(), RecordState::Pending);
    assert_eq!(engine.pooled_bonds(), REQUIRED_STAKE);
    assert!(engine.drain_events().is_empty());

    engine.withdraw(&claimant(), clock.now()).unwrap();
    assert_eq!(engine.state_of(&claimant()).unwrap(), RecordState::Settled);
}

#[test]
fn failed_record_write_refunds_bond() {
    let clock = NullClock::new(0);
    let mut engine = setup();
    let before = engine.ledger().balance_of(&claimant());

    engine.store().set_fail_writes(true);
    let err = submit_50(&mut engine, &clock).unwrap_err();
    assert_eq!(err.kind(), "store_error");
    assert_eq!(engine.ledger().balance_of(&claimant()), before);
    assert_eq!(engine.pooled_bonds(), StakeAmount::ZERO);
    assert!(engine.drain_events().is_empty());

    engine.store().set_fail_writes(false);
    submit_50(&mut engine, &clock).unwrap();
}

#[test]
fn failed_restore_after_dispute_payout_reports_transfer_error() {
    let clock = NullClock::new(0);
    let mut engine = setup();
    submit_50(&mut engine, &clock).unwrap();
    engine.drain_events();

    engine.ledger_mut().fail_next_payout();
    // The delete goes through; restoring the record does not.
    engine.store().fail_writes_after(1);
    let err = engine
        .dispute(&verifier(), &claimant(), 12, &cid1(), &verifier())
        .unwrap_err();

    assert_eq!(err.kind(), "transfer_failed");
    assert!(matches!(err, AttestationError::Transfer(_)));
    assert!(engine.drain_events().is_empty());
}

#[test]
fn failed_restore_after_withdraw_payout_reports_transfer_error() {
    let clock = NullClock::new(0);
    let mut engine = setup();
    let fin = submit_50(&mut engine, &clock).unwrap();
    clock.set(fin.as_secs());
    engine.drain_events();

    engine.ledger_mut().fail_next_payout();
    engine.store().fail_writes_after(1);
    let err = engine.withdraw(&claimant(), clock.now()).unwrap_err();

    assert_eq!(err.kind(), "transfer_failed");
    assert!(matches!(err, AttestationError::Transfer(_)));
    assert_eq!(engine.pooled_bonds(), REQUIRED_STAKE);
    assert!(engine.drain_events().is_empty());
}
