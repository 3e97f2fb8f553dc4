//! Testimonials are append-only: list and create, nothing else.

use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    error::ApiError,
    responses::InsertResponse,
    state::AppState,
    store::{Collection, Document, Filter},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/testimonials", get(list_testimonials).post(create_testimonial))
}

#[instrument(skip(state))]
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let testimonials = state
        .store
        .find(Collection::Testimonials, &Filter::All, None)
        .await?;
    Ok(Json(testimonials))
}

#[instrument(skip(state, testimonial))]
pub async fn create_testimonial(
    State(state): State<AppState>,
    Json(testimonial): Json<Document>,
) -> Result<Json<InsertResponse>, ApiError> {
    let id = state
        .store
        .insert_one(Collection::Testimonials, testimonial)
        .await?;
    Ok(Json(InsertResponse::new(id)))
}
