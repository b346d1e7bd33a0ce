//! Axum-based RPC server.

use std::future::Future;
use std::sync::Arc;

use attest_node::DefaultService;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::RpcError;
use crate::handlers;

/// Shared state handed to every handler.
pub struct RpcState {
    pub service: Arc<DefaultService>,
}

/// Build the API router. The faucet route exists only when `enable_faucet`.
pub fn router(service: Arc<DefaultService>, enable_faucet: bool) -> Router {
    let mut app = Router::new()
        .route("/attestations", post(handlers::submit))
        .route("/attestations/:identity", get(handlers::get_attestation))
        .route("/attestations/:identity/dispute", post(handlers::dispute))
        .route("/attestations/:identity/withdraw", post(handlers::withdraw))
        .route("/admin/algorithms", post(handlers::add_algorithm))
        .route("/admin/verifiers", post(handlers::add_verifier))
        .route("/admin/transfer", post(handlers::transfer_admin))
        .route("/algorithms/:algorithm", get(handlers::get_algorithm))
        .route("/verifiers/:identity", get(handlers::get_verifier))
        .route("/constants", get(handlers::constants))
        .route("/events", get(handlers::events))
        .route("/metrics", get(handlers::metrics));
    if enable_faucet {
        app = app.route("/faucet", post(handlers::faucet));
    }
    app.with_state(Arc::new(RpcState { service }))
}

pub struct RpcServer {
    pub bind: String,
    pub port: u16,
    pub enable_faucet: bool,
    pub cors: bool,
    service: Arc<DefaultService>,
}

impl RpcServer {
    pub fn new(bind: impl Into<String>, port: u16, service: Arc<DefaultService>) -> Self {
        Self {
            bind: bind.into(),
            port,
            enable_faucet: false,
            cors: false,
            service,
        }
    }

    pub fn with_faucet(mut self, enable: bool) -> Self {
        self.enable_faucet = enable;
        self
    }

    pub fn with_cors(mut self, enable: bool) -> Self {
        self.cors = enable;
        self
    }

    /// Serve until `shutdown` resolves.
    pub async fn start(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let mut app = router(Arc::clone(&self.service), self.enable_faucet);
        if self.cors {
            app = app.layer(CorsLayer::permissive());
        }

        let addr = format!("{}:{}", self.bind, self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        info!(%addr, faucet = self.enable_faucet, "RPC server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
