//! Serialized attestation service.

use std::sync::Arc;

use attest_engine::{AttestationEngine, AttestationError};
use attest_stake::{BondLedger, InMemoryLedger};
use attest_store::{AttestationRecord, AttestationStore, MemoryStore, RecordState};
use attest_types::{AlgorithmRef, Clock, Identity, StakeAmount, SystemClock, Timestamp};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{EventLog, ServiceConfig, ServiceError, ServiceMetrics};

/// The production pairing of backends.
pub type DefaultService = AttestationService<MemoryStore, InMemoryLedger>;

/// Shared front door to an [`AttestationEngine`].
///
/// One mutex guards the engine. Each operation reads the clock, applies, and
/// appends its facts to the [`EventLog`] while holding it, so the log order
/// is the order in which operations took effect.
pub struct AttestationService<S, L> {
    engine: Mutex<AttestationEngine<S, L>>,
    clock: Arc<dyn Clock>,
    events: EventLog,
    metrics: ServiceMetrics,
}

impl<S, L> AttestationService<S, L>
where
    S: AttestationStore + Send,
    L: BondLedger + Send,
{
    /// Wrap `engine`. Facts it already holds (e.g. bootstrap approvals) are
    /// moved into the log first.
    pub fn new(
        mut engine: AttestationEngine<S, L>,
        clock: Arc<dyn Clock>,
        event_channel_capacity: usize,
    ) -> Result<Self, ServiceError> {
        let events = EventLog::new(event_channel_capacity);
        let metrics = ServiceMetrics::new()?;
        for event in engine.drain_events() {
            metrics.observe_event(&event);
            events.append(event);
        }
        let service = Self {
            engine: Mutex::new(engine),
            clock,
            events,
            metrics,
        };
        Ok(service)
    }

    /// Run one operation under the engine lock and publish its outcome.
    async fn apply<T>(
        &self,
        operation: &'static str,
        op: impl FnOnce(&mut AttestationEngine<S, L>, Timestamp) -> Result<T, AttestationError>,
    ) -> Result<T, ServiceError> {
        let mut engine = self.engine.lock().await;
        let now = self.clock.now();
        let result = op(&mut *engine, now);

        for event in engine.drain_events() {
            self.metrics.observe_event(&event);
            let seq = self.events.append(event);
            debug!(operation, seq, "event appended");
        }
        self.refresh_gauges(&*engine);

        result.map_err(|e| {
            debug!(operation, kind = e.kind(), error = %e, "operation rejected");
            self.metrics.observe_rejection(operation, e.kind());
            e.into()
        })
    }

    fn refresh_gauges(&self, engine: &AttestationEngine<S, L>) {
        if let Ok(outstanding) = engine.outstanding_count() {
            self.metrics
                .outstanding_records
                .set(i64::try_from(outstanding).unwrap_or(i64::MAX));
        }
        self.metrics
            .pooled_bonds
            .set(engine.pooled_bonds().raw() as f64);
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Returns the finalization time of the new record.
    pub async fn submit(
        &self,
        caller: &Identity,
        score: u64,
        algorithm: &AlgorithmRef,
        observed_at: Timestamp,
        stake: StakeAmount,
    ) -> Result<Timestamp, ServiceError> {
        self.apply("submit", |engine, now| {
            engine.submit(caller, score, algorithm, observed_at, stake, now)
        })
        .await
    }

    pub async fn dispute(
        &self,
        caller: &Identity,
        claimant: &Identity,
        asserted_score: u64,
        algorithm: &AlgorithmRef,
        reward_recipient: &Identity,
    ) -> Result<(), ServiceError> {
        self.apply("dispute", |engine, _| {
            engine.dispute(caller, claimant, asserted_score, algorithm, reward_recipient)
        })
        .await
    }

    /// Returns the amount paid back to `caller`.
    pub async fn withdraw(&self, caller: &Identity) -> Result<StakeAmount, ServiceError> {
        self.apply("withdraw", |engine, now| engine.withdraw(caller, now))
            .await
    }

    pub async fn add_algorithm(
        &self,
        caller: &Identity,
        algorithm: AlgorithmRef,
    ) -> Result<bool, ServiceError> {
        self.apply("add_algorithm", |engine, _| {
            engine.add_algorithm(caller, algorithm)
        })
        .await
    }

    pub async fn add_verifier(
        &self,
        caller: &Identity,
        verifier: Identity,
    ) -> Result<bool, ServiceError> {
        self.apply("add_verifier", |engine, _| engine.add_verifier(caller, verifier))
            .await
    }

    pub async fn transfer_admin(
        &self,
        caller: &Identity,
        new_admin: Identity,
    ) -> Result<(), ServiceError> {
        self.apply("transfer_admin", |engine, _| {
            engine.transfer_admin(caller, new_admin)
        })
        .await
    }

    /// Deposit external funds into `to`'s spendable balance. Returns the new
    /// balance.
    pub async fn fund(&self, to: &Identity, amount: StakeAmount) -> Result<StakeAmount, ServiceError> {
        let mut engine = self.engine.lock().await;
        engine.ledger_mut().credit(to, amount)?;
        let balance = engine.ledger().balance_of(to);
        info!(%to, %amount, %balance, "account funded");
        Ok(balance)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub async fn record(&self, identity: &Identity) -> Result<Option<AttestationRecord>, ServiceError> {
        Ok(self.engine.lock().await.record(identity)?)
    }

    pub async fn state_of(&self, identity: &Identity) -> Result<RecordState, ServiceError> {
        Ok(self.engine.lock().await.state_of(identity)?)
    }

    /// Seconds until `identity`'s outstanding record can be withdrawn, or
    /// `None` if nothing is outstanding.
    pub async fn remaining_window(&self, identity: &Identity) -> Result<Option<u64>, ServiceError> {
        let engine = self.engine.lock().await;
        Ok(engine.remaining_window(identity, self.clock.now())?)
    }

    pub async fn is_algorithm_approved(&self, algorithm: &AlgorithmRef) -> bool {
        self.engine.lock().await.is_algorithm_approved(algorithm)
    }

    pub async fn is_verifier(&self, identity: &Identity) -> bool {
        self.engine.lock().await.is_verifier(identity)
    }

    pub async fn admin(&self) -> Identity {
        self.engine.lock().await.admin().clone()
    }

    pub async fn pooled_bonds(&self) -> StakeAmount {
        self.engine.lock().await.pooled_bonds()
    }

    pub async fn balance_of(&self, who: &Identity) -> StakeAmount {
        self.engine.lock().await.ledger().balance_of(who)
    }

    /// Run `f` against the engine under the service lock. Facts emitted by
    /// `f` are not published.
    pub async fn with_engine<T>(&self, f: impl FnOnce(&mut AttestationEngine<S, L>) -> T) -> T {
        let mut engine = self.engine.lock().await;
        f(&mut *engine)
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }
}

impl DefaultService {
    /// Build an in-memory service from `config`, approving its bootstrap
    /// algorithms and verifiers on behalf of the configured administrator.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(
        config: &ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ServiceError> {
        config.validate()?;
        let admin = config.admin_identity()?;
        let mut engine =
            AttestationEngine::new(admin.clone(), MemoryStore::default(), InMemoryLedger::new());
        for algorithm in config.algorithms()? {
            engine.add_algorithm(&admin, algorithm)?;
        }
        for verifier in config.verifiers()? {
            engine.add_verifier(&admin, verifier)?;
        }
        info!(
            %admin,
            algorithms = engine.registry().algorithm_count(),
            verifiers = engine.registry().verifier_count(),
            "attestation service initialized"
        );
        Self::new(engine, clock, config.event_channel_capacity)
    }
}
