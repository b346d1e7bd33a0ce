use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Attestation(#[from] attest_engine::AttestationError),

    #[error("ledger error: {0}")]
    Ledger(#[from] attest_stake::LedgerError),

    #[error("config error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
