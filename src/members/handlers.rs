use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    responses::InsertResponse,
    state::AppState,
    store::{Collection, Document, Filter, StoreError},
};

pub fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members).post(join))
        .route("/members/:id", get(get_member))
}

#[instrument(skip(state))]
pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let members = state
        .store
        .find(Collection::Members, &Filter::All, None)
        .await?;
    Ok(Json(members))
}

#[instrument(skip(state))]
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    state
        .store
        .find_one(Collection::Members, &Filter::Id(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// POST /members → 409 if the user already holds a membership.
#[instrument(skip(state, member))]
pub async fn join(
    State(state): State<AppState>,
    Json(member): Json<Document>,
) -> Result<Json<InsertResponse>, ApiError> {
    // uniqueness of userEmail is enforced by the store, not by a prior lookup
    match state.store.insert_one(Collection::Members, member).await {
        Ok(id) => {
            info!(member_id = %id, "member joined");
            Ok(Json(InsertResponse::new(id)))
        }
        Err(StoreError::Duplicate { .. }) => {
            warn!("duplicate membership rejected");
            Err(ApiError::Conflict("user is already a member".into()))
        }
        Err(e) => Err(e.into()),
    }
}
