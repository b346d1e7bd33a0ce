//! Prometheus metrics for the attestation service.
//!
//! [`ServiceMetrics`] owns a dedicated [`Registry`] that the RPC `/metrics`
//! endpoint encodes into the Prometheus text exposition format.

use attest_engine::AttestationEvent;
use prometheus::{
    register_gauge_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, Gauge,
    IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

use crate::ServiceError;

pub struct ServiceMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub submissions: IntCounter,
    pub disputes: IntCounter,
    pub withdrawals: IntCounter,
    /// Allowlist appends and administrator transfers.
    pub registry_changes: IntCounter,
    /// Rejected operations, labelled by operation and error kind.
    pub rejections: IntCounterVec,
    /// Payouts that failed and had their record mutation restored.
    pub rolled_back_transfers: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    pub outstanding_records: IntGauge,
    /// Pooled bonds in raw units (as f64; precision loss above 2^53 is acceptable for dashboards).
    pub pooled_bonds: Gauge,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self, ServiceError> {
        let registry = Registry::new();

        let submissions = register_int_counter_with_registry!(
            Opts::new("attest_submissions_total", "Accepted submissions"),
            registry
        )?;
        let disputes = register_int_counter_with_registry!(
            Opts::new("attest_disputes_total", "Successful disputes"),
            registry
        )?;
        let withdrawals = register_int_counter_with_registry!(
            Opts::new("attest_withdrawals_total", "Bonds withdrawn by claimants"),
            registry
        )?;
        let registry_changes = register_int_counter_with_registry!(
            Opts::new(
                "attest_registry_changes_total",
                "Allowlist additions and administrator transfers"
            ),
            registry
        )?;
        let rejections = register_int_counter_vec_with_registry!(
            Opts::new("attest_rejections_total", "Rejected operations"),
            &["operation", "kind"],
            registry
        )?;
        let rolled_back_transfers = register_int_counter_with_registry!(
            Opts::new(
                "attest_rolled_back_transfers_total",
                "Payouts rejected by the ledger and rolled back"
            ),
            registry
        )?;
        let outstanding_records = register_int_gauge_with_registry!(
            Opts::new(
                "attest_outstanding_records",
                "Records with a bond still escrowed"
            ),
            registry
        )?;
        let pooled_bonds = register_gauge_with_registry!(
            Opts::new("attest_pooled_bonds_raw", "Escrowed bond value in raw units"),
            registry
        )?;

        Ok(Self {
            registry,
            submissions,
            disputes,
            withdrawals,
            registry_changes,
            rejections,
            rolled_back_transfers,
            outstanding_records,
            pooled_bonds,
        })
    }

    pub fn observe_event(&self, event: &AttestationEvent) {
        match event {
            AttestationEvent::Submitted { .. } => self.submissions.inc(),
            AttestationEvent::Disputed { .. } => self.disputes.inc(),
            AttestationEvent::Withdrawn { .. } => self.withdrawals.inc(),
            AttestationEvent::AlgorithmApproved { .. }
            | AttestationEvent::VerifierApproved { .. }
            | AttestationEvent::AdminTransferred { .. } => self.registry_changes.inc(),
        }
    }

    pub fn observe_rejection(&self, operation: &str, kind: &str) {
        self.rejections.with_label_values(&[operation, kind]).inc();
        // Only dispute and withdraw pay out of the pool.
        if kind == "transfer_failed" && matches!(operation, "dispute" | "withdraw") {
            self.rolled_back_transfers.inc();
        }
    }

    /// Encode every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, ServiceError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
