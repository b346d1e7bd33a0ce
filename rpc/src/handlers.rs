//! RPC request handlers.

use std::sync::Arc;

use attest_engine::AttestationError;
use attest_node::{SequencedEvent, ServiceError};
use attest_store::RecordState;
use attest_types::{
    AlgorithmRef, Identity, StakeAmount, Timestamp, CHALLENGE_WINDOW_SECS, REQUIRED_STAKE,
};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::extract::ApiJson;
use crate::pagination::{next_since, EventsQuery, PageMeta};
use crate::server::RpcState;

// ── Parsing helpers ──────────────────────────────────────────────────────

fn identity(field: &str, raw: &str) -> Result<Identity, RpcError> {
    Identity::parse(raw).map_err(|e| RpcError::InvalidRequest(format!("{field}: {e}")))
}

fn algorithm(raw: &str) -> Result<AlgorithmRef, RpcError> {
    AlgorithmRef::parse(raw).map_err(|e| RpcError::InvalidRequest(format!("algorithm: {e}")))
}

/// Amounts travel as decimal strings so that u128 values survive JSON.
fn amount(field: &str, raw: &str) -> Result<StakeAmount, RpcError> {
    raw.parse::<u128>()
        .map(StakeAmount::new)
        .map_err(|e| RpcError::InvalidRequest(format!("{field}: {e}")))
}

// ── Attestations ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub caller: String,
    pub score: u64,
    pub algorithm: String,
    pub observed_at: u64,
    pub stake: String,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub identity: String,
    pub finalization_time: u64,
}

pub async fn submit(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<SubmitRequest>,
) -> Result<Json<SubmitResponse>, RpcError> {
    let caller = identity("caller", &req.caller)?;
    let algorithm = algorithm(&req.algorithm)?;
    let stake = amount("stake", &req.stake)?;
    let finalization_time = state
        .service
        .submit(
            &caller,
            req.score,
            &algorithm,
            Timestamp::new(req.observed_at),
            stake,
        )
        .await?;
    Ok(Json(SubmitResponse {
        identity: caller.to_string(),
        finalization_time: finalization_time.as_secs(),
    }))
}

#[derive(Deserialize)]
pub struct DisputeRequest {
    pub caller: String,
    pub asserted_score: u64,
    pub algorithm: String,
    pub reward_recipient: String,
}

#[derive(Serialize)]
pub struct DisputeResponse {
    pub claimant: String,
    pub reward_recipient: String,
    pub reward: String,
}

pub async fn dispute(
    State(state): State<Arc<RpcState>>,
    Path(claimant): Path<String>,
    ApiJson(req): ApiJson<DisputeRequest>,
) -> Result<Json<DisputeResponse>, RpcError> {
    let claimant = identity("claimant", &claimant)?;
    let caller = identity("caller", &req.caller)?;
    let algorithm = algorithm(&req.algorithm)?;
    let recipient = identity("reward_recipient", &req.reward_recipient)?;
    state
        .service
        .dispute(&caller, &claimant, req.asserted_score, &algorithm, &recipient)
        .await?;
    Ok(Json(DisputeResponse {
        claimant: claimant.to_string(),
        reward_recipient: recipient.to_string(),
        reward: REQUIRED_STAKE.raw().to_string(),
    }))
}

#[derive(Serialize)]
pub struct WithdrawResponse {
    pub identity: String,
    pub amount: String,
}

/// The path identity is the caller: only a claimant can withdraw its own bond.
pub async fn withdraw(
    State(state): State<Arc<RpcState>>,
    Path(caller): Path<String>,
) -> Result<Json<WithdrawResponse>, RpcError> {
    let caller = identity("identity", &caller)?;
    let amount = state.service.withdraw(&caller).await?;
    Ok(Json(WithdrawResponse {
        identity: caller.to_string(),
        amount: amount.raw().to_string(),
    }))
}

#[derive(Serialize)]
pub struct RecordResponse {
    pub identity: String,
    pub state: RecordState,
    pub score: u64,
    pub algorithm: String,
    pub submitted_at: u64,
    pub observed_at: u64,
    pub finalization_time: u64,
    pub settled: bool,
    /// Seconds until the bond can be withdrawn; absent once settled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<u64>,
}

pub async fn get_attestation(
    State(state): State<Arc<RpcState>>,
    Path(raw): Path<String>,
) -> Result<Json<RecordResponse>, RpcError> {
    let id = identity("identity", &raw)?;
    let service = &state.service;
    // One lock so the window matches the record it was computed from.
    let (record, remaining_secs) = service
        .with_engine(|engine| -> Result<_, AttestationError> {
            let now = service.now();
            Ok((engine.record(&id)?, engine.remaining_window(&id, now)?))
        })
        .await
        .map_err(ServiceError::from)?;
    let record =
        record.ok_or_else(|| RpcError::NotFound(format!("attestation for {id}")))?;
    Ok(Json(RecordResponse {
        identity: id.to_string(),
        state: RecordState::of(Some(&record)),
        score: u64::from(record.score.value()),
        algorithm: record.algorithm.to_string(),
        submitted_at: record.submitted_at.as_secs(),
        observed_at: record.observed_at.as_secs(),
        finalization_time: record.finalization_time.as_secs(),
        settled: record.settled,
        remaining_secs,
    }))
}

// ── Administration ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddAlgorithmRequest {
    pub caller: String,
    pub algorithm: String,
}

#[derive(Deserialize)]
pub struct AddVerifierRequest {
    pub caller: String,
    pub verifier: String,
}

#[derive(Serialize)]
pub struct AddedResponse {
    /// False when the entry was already present.
    pub added: bool,
}

pub async fn add_algorithm(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<AddAlgorithmRequest>,
) -> Result<Json<AddedResponse>, RpcError> {
    let caller = identity("caller", &req.caller)?;
    let algorithm = algorithm(&req.algorithm)?;
    let added = state.service.add_algorithm(&caller, algorithm).await?;
    Ok(Json(AddedResponse { added }))
}

pub async fn add_verifier(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<AddVerifierRequest>,
) -> Result<Json<AddedResponse>, RpcError> {
    let caller = identity("caller", &req.caller)?;
    let verifier = identity("verifier", &req.verifier)?;
    let added = state.service.add_verifier(&caller, verifier).await?;
    Ok(Json(AddedResponse { added }))
}

#[derive(Deserialize)]
pub struct TransferAdminRequest {
    pub caller: String,
    pub new_admin: String,
}

#[derive(Serialize)]
pub struct AdminResponse {
    pub admin: String,
}

pub async fn transfer_admin(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<TransferAdminRequest>,
) -> Result<Json<AdminResponse>, RpcError> {
    let caller = identity("caller", &req.caller)?;
    let new_admin = identity("new_admin", &req.new_admin)?;
    state
        .service
        .transfer_admin(&caller, new_admin.clone())
        .await?;
    Ok(Json(AdminResponse {
        admin: new_admin.to_string(),
    }))
}

// ── Allowlist queries ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MembershipResponse {
    pub member: String,
    pub approved: bool,
}

pub async fn get_algorithm(
    State(state): State<Arc<RpcState>>,
    Path(raw): Path<String>,
) -> Result<Json<MembershipResponse>, RpcError> {
    let algorithm = algorithm(&raw)?;
    let approved = state.service.is_algorithm_approved(&algorithm).await;
    Ok(Json(MembershipResponse {
        member: algorithm.to_string(),
        approved,
    }))
}

pub async fn get_verifier(
    State(state): State<Arc<RpcState>>,
    Path(raw): Path<String>,
) -> Result<Json<MembershipResponse>, RpcError> {
    let verifier = identity("verifier", &raw)?;
    let approved = state.service.is_verifier(&verifier).await;
    Ok(Json(MembershipResponse {
        member: verifier.to_string(),
        approved,
    }))
}

// ── Protocol info ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ConstantsResponse {
    pub challenge_window_secs: u64,
    pub required_stake: String,
    pub admin: String,
    pub pooled_bonds: String,
}

pub async fn constants(State(state): State<Arc<RpcState>>) -> Json<ConstantsResponse> {
    Json(ConstantsResponse {
        challenge_window_secs: CHALLENGE_WINDOW_SECS,
        required_stake: REQUIRED_STAKE.raw().to_string(),
        admin: state.service.admin().await.to_string(),
        pooled_bonds: state.service.pooled_bonds().await.raw().to_string(),
    })
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub events: Vec<SequencedEvent>,
    #[serde(flatten)]
    pub page: PageMeta,
}

pub async fn events(
    State(state): State<Arc<RpcState>>,
    Query(query): Query<EventsQuery>,
) -> Json<EventsResponse> {
    let start = query.start();
    let limit = query.effective_limit();
    let events = state.service.events().since(start, limit as usize);
    let next = next_since(start, events.len(), limit);
    Json(EventsResponse {
        events,
        page: PageMeta { next },
    })
}

pub async fn metrics(State(state): State<Arc<RpcState>>) -> Result<impl IntoResponse, RpcError> {
    let body = state.service.metrics().encode()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

// ── Faucet ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FaucetRequest {
    pub to: String,
    pub amount: String,
}

#[derive(Serialize)]
pub struct FaucetResponse {
    pub to: String,
    pub balance: String,
}

pub async fn faucet(
    State(state): State<Arc<RpcState>>,
    ApiJson(req): ApiJson<FaucetRequest>,
) -> Result<Json<FaucetResponse>, RpcError> {
    let to = identity("to", &req.to)?;
    let amount = amount("amount", &req.amount)?;
    let balance = state.service.fund(&to, amount).await?;
    Ok(Json(FaucetResponse {
        to: to.to_string(),
        balance: balance.raw().to_string(),
    }))
}
