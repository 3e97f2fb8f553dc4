use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{ProviderQuery, ServiceUpdate, SortQuery};
use crate::{
    auth::AuthUser,
    error::ApiError,
    responses::{DeleteResponse, InsertResponse, UpdateResponse},
    state::AppState,
    store::{Collection, Document, Filter},
};

pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services))
        .route(
            "/services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route("/manageservices", get(manage_services))
        .route("/sortservices", get(sort_services))
        .route("/addServices", post(add_service))
}

#[instrument(skip(state))]
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Document>>, ApiError> {
    let services = state
        .store
        .find(Collection::Services, &Filter::All, None)
        .await?;
    Ok(Json(services))
}

#[instrument(skip(state))]
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError> {
    state
        .store
        .find_one(Collection::Services, &Filter::Id(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// GET /manageservices?email= → services offered by one provider.
#[instrument(skip(state, user))]
pub async fn manage_services(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<ProviderQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = match q.email.filter(|e| !e.is_empty()) {
        Some(email) => Filter::eq("providerEmail", email),
        None => Filter::All,
    };
    tracing::debug!(caller = %user.0.email, ?filter, "manage services");
    let services = state.store.find(Collection::Services, &filter, None).await?;
    Ok(Json(services))
}

#[instrument(skip(state))]
pub async fn sort_services(
    State(state): State<AppState>,
    Query(q): Query<SortQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let sort = q.sort();
    let services = state
        .store
        .find(Collection::Services, &Filter::All, sort.as_ref())
        .await?;
    Ok(Json(services))
}

#[instrument(skip(state, user, service))]
pub async fn add_service(
    State(state): State<AppState>,
    user: AuthUser,
    Json(service): Json<Document>,
) -> Result<Json<InsertResponse>, ApiError> {
    let id = state.store.insert_one(Collection::Services, service).await?;
    info!(service_id = %id, caller = %user.0.email, "service added");
    Ok(Json(InsertResponse::new(id)))
}

/// PUT /services/:id → sets the service fields, creating the service if absent.
#[instrument(skip(state, update))]
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ServiceUpdate>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let outcome = state
        .store
        .update_one(Collection::Services, id, update.into_set(), true)
        .await?;
    Ok(Json(outcome.into()))
}

#[instrument(skip(state))]
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.store.delete_one(Collection::Services, id).await?;
    Ok(Json(DeleteResponse::new(deleted)))
}
