//! RPC error types and their HTTP mapping.

use attest_engine::AttestationError;
use attest_node::ServiceError;
use attest_stake::LedgerError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("server error: {0}")]
    Server(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl RpcError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound(_) => "not_found",
            Self::Service(ServiceError::Attestation(e)) => e.kind(),
            Self::Service(ServiceError::Ledger(_)) => "ledger_error",
            Self::Service(ServiceError::Config(_)) => "config_error",
            Self::Service(ServiceError::Metrics(_)) => "metrics_error",
            Self::Server(_) => "server_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Service(ServiceError::Attestation(e)) => attestation_status(e),
            Self::Service(ServiceError::Ledger(_)) => StatusCode::BAD_REQUEST,
            Self::Service(_) | Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn attestation_status(e: &AttestationError) -> StatusCode {
    use AttestationError::*;
    match e {
        InvalidScore { .. }
        | InvalidAlgorithm(_)
        | IncorrectStake { .. }
        | InvalidDispute(_)
        | InvalidWithdraw(_)
        | ClockOverflow => StatusCode::BAD_REQUEST,
        Unauthorized(_) => StatusCode::FORBIDDEN,
        OutstandingRecord(_) | DisputeDenied(_) | WithdrawNotReady { .. } => StatusCode::CONFLICT,
        // The claimant could not cover the bond.
        Transfer(LedgerError::InsufficientFunds { .. }) => StatusCode::BAD_REQUEST,
        Transfer(_) | Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
