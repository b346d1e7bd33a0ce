//! Request extractors that report failures as [`RpcError`].

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::RpcError;

/// `Json<T>` whose rejections (bad syntax, wrong content type, missing or
/// mistyped fields) become `400 invalid_request` with the usual JSON body.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RpcError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| RpcError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
