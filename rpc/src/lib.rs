//! HTTP JSON API for the attestation service.
//!
//! Provides endpoints for:
//! - Submitting, disputing, and withdrawing attestations
//! - Record, allowlist, and constant queries
//! - Administrator allowlist management and handover
//! - Paging through the event log
//! - Prometheus metrics
//! - A development faucet (when enabled)
//!
//! The caller identity travels in the request; transport authentication is
//! left to whatever fronts the server.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod pagination;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer, RpcState};
