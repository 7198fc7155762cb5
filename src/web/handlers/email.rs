//! Email handlers for the JSON API.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::web::dto::{
    BatchRequest, EmailEntryResponse, EmailRequest, UpdateEmailRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /email/create - Register a new address.
pub async fn create_email(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> Result<Json<Option<EmailEntryResponse>>, ApiError> {
    tracing::info!(email = %req.email, "JSON CreateEmail");

    let entry = state.registry.create(&req.email).await?;
    Ok(Json(entry.map(Into::into)))
}

/// GET /email/get - Look up an address. Unknown addresses yield `null`.
pub async fn get_email(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> Result<Json<Option<EmailEntryResponse>>, ApiError> {
    tracing::info!(email = %req.email, "JSON GetEmail");

    let entry = state.registry.get(&req.email).await?;
    Ok(Json(entry.map(Into::into)))
}

/// GET /email/getbatch - List one page of subscribed entries.
pub async fn get_email_batch(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<BatchRequest>,
) -> Result<Json<Vec<EmailEntryResponse>>, ApiError> {
    tracing::info!(page = req.page, count = req.count, "JSON GetEmailBatch");

    let entries = state.registry.batch(req.page, req.count).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// PUT /email/update - Insert or overwrite an entry.
pub async fn update_email(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<UpdateEmailRequest>,
) -> Result<Json<Option<EmailEntryResponse>>, ApiError> {
    tracing::info!(email = %req.email, "JSON UpdateEmail");

    let update = req.into_update();
    let entry = state.registry.update(&update).await?;
    Ok(Json(entry.map(Into::into)))
}

/// POST /email/delete - Opt an address out.
pub async fn delete_email(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> Result<Json<Option<EmailEntryResponse>>, ApiError> {
    tracing::info!(email = %req.email, "JSON DeleteEmail");

    let entry = state.registry.delete(&req.email).await?;
    Ok(Json(entry.map(Into::into)))
}
