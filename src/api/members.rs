use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::api::AppState;
use crate::api::error::{ApiError, Result};
use crate::api::payload::parse_member;
use crate::store::Member;

/// GET /members
pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>> {
    let store = state.read()?;
    debug!("Listing {} members", store.len());
    Ok(Json(store.list().to_vec()))
}

/// POST /member
///
/// The body is decoded as JSON whatever its content type.
pub async fn create_member(State(state): State<AppState>, body: Bytes) -> Result<Json<Member>> {
    let body: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
    let member = parse_member(&body)?;

    // Hold the write lock across the duplicate check and the insert
    let mut store = state.write()?;
    if store.contains(member.id) {
        info!("Refusing member {}: id already taken", member.id);
        return Err(ApiError::DuplicateId);
    }
    store.add(member.clone());
    info!("Added member {} ({})", member.id, member.first_name);

    Ok(Json(member))
}

/// GET /member/{id}
pub async fn get_member(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Member>> {
    let id = parse_id(&raw_id)?;
    let store = state.read()?;
    debug!("Looking up member {}", id);
    store
        .find(id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::MemberNotFound)
}

/// DELETE /member/{id}
pub async fn delete_member(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&raw_id)?;
    let mut store = state.write()?;
    if !store.contains(id) {
        return Err(ApiError::MemberNotFound);
    }
    store.remove(id);
    info!("Deleted member {}", id);

    Ok(Json(json!({ "done": true })))
}

/// A non-integer id segment does not address any member
fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>().map_err(|_| ApiError::MemberNotFound)
}
