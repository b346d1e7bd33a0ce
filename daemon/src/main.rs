//! Attestation daemon: entry point for running an attestation service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use attest_node::{DefaultService, ServiceConfig};
use attest_rpc::RpcServer;
use clap::Parser;

#[derive(Parser)]
#[command(name = "attest-daemon", about = "Bonded attestation service daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ATTEST_CONFIG")]
    config: Option<PathBuf>,

    /// Administrator identity.
    #[arg(long, env = "ATTEST_ADMIN")]
    admin: Option<String>,

    /// Address the HTTP API binds to.
    #[arg(long, env = "ATTEST_RPC_BIND")]
    rpc_bind: Option<String>,

    /// HTTP API port.
    #[arg(long, env = "ATTEST_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Disable the HTTP API.
    #[arg(long, env = "ATTEST_DISABLE_RPC")]
    no_rpc: bool,

    /// Answer cross-origin requests.
    #[arg(long, env = "ATTEST_RPC_CORS")]
    cors: bool,

    /// Enable the development faucet endpoint.
    #[arg(long, env = "ATTEST_ENABLE_FAUCET")]
    faucet: bool,

    /// Log format: "human" or "json".
    #[arg(long, env = "ATTEST_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ATTEST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Algorithms to approve at startup (comma-separated).
    #[arg(long, env = "ATTEST_ALGORITHMS", value_delimiter = ',')]
    algorithms: Vec<String>,

    /// Verifiers to approve at startup (comma-separated).
    #[arg(long, env = "ATTEST_VERIFIERS", value_delimiter = ',')]
    verifiers: Vec<String>,
}

impl Cli {
    /// Layer CLI flags over `base`.
    fn apply(self, base: ServiceConfig) -> ServiceConfig {
        ServiceConfig {
            admin: self.admin.unwrap_or(base.admin),
            rpc_bind: self.rpc_bind.unwrap_or(base.rpc_bind),
            rpc_port: self.rpc_port.unwrap_or(base.rpc_port),
            enable_rpc: base.enable_rpc && !self.no_rpc,
            rpc_cors: self.cors || base.rpc_cors,
            enable_faucet: self.faucet || base.enable_faucet,
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.unwrap_or(base.log_level),
            bootstrap_algorithms: if self.algorithms.is_empty() {
                base.bootstrap_algorithms
            } else {
                self.algorithms
            },
            bootstrap_verifiers: if self.verifiers.is_empty() {
                base.bootstrap_verifiers
            } else {
                self.verifiers
            },
            ..base
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    let base = match cli.config.take() {
        Some(path) => ServiceConfig::from_toml_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    let config = cli.apply(base);
    config.validate().context("invalid configuration")?;

    attest_utils::init_logging(config.log_format()?, &config.log_level)
        .context("installing log subscriber")?;

    let service = Arc::new(DefaultService::from_config(&config)?);
    tracing::info!(
        admin = %config.admin,
        rpc = config.enable_rpc,
        faucet = config.enable_faucet,
        "starting attestation daemon"
    );

    if config.enable_rpc {
        let server = RpcServer::new(config.rpc_bind.clone(), config.rpc_port, Arc::clone(&service))
            .with_faucet(config.enable_faucet)
            .with_cors(config.rpc_cors);
        server.start(shutdown_signal()).await?;
    } else {
        shutdown_signal().await;
    }

    tracing::info!(
        events = service.events().len(),
        "shutdown signal received, attestation daemon exited cleanly"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
