use axum::{
    extract::{Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::filter::BookingQuery;
use crate::{
    auth::AuthUser,
    error::ApiError,
    responses::{DeleteResponse, InsertResponse, UpdateResponse},
    state::AppState,
    store::{Collection, Document},
};

pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<Value>,
}

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/:id", patch(update_status).delete(delete_booking))
}

/// Sets `status` to "pending" when missing, null, false or empty.
fn apply_default_status(booking: &mut Document) {
    let unset = match booking.get("status") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if unset {
        booking.insert("status".into(), Value::String(DEFAULT_STATUS.into()));
    }
}

#[instrument(skip(state, user))]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
    Query(q): Query<BookingQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let filter = q.filter();
    debug!(caller = %user.0.email, ?filter, "list bookings");
    let bookings = state.store.find(Collection::Bookings, &filter, None).await?;
    Ok(Json(bookings))
}

#[instrument(skip(state, booking))]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(mut booking): Json<Document>,
) -> Result<Json<InsertResponse>, ApiError> {
    apply_default_status(&mut booking);
    let id = state.store.insert_one(Collection::Bookings, booking).await?;
    info!(booking_id = %id, "booking created");
    Ok(Json(InsertResponse::new(id)))
}

/// PATCH /bookings/:id { status } → overwrites the status, any value allowed.
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let mut set = Document::new();
    set.insert("status".into(), update.status.unwrap_or(Value::Null));
    let outcome = state
        .store
        .update_one(Collection::Bookings, id, set, false)
        .await?;
    Ok(Json(outcome.into()))
}

#[instrument(skip(state))]
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.store.delete_one(Collection::Bookings, id).await?;
    Ok(Json(DeleteResponse::new(deleted)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().expect("object")
    }

    #[test]
    fn default_status_fills_falsy_values_only() {
        for input in [json!({}), json!({"status": null}), json!({"status": ""}), json!({"status": false})] {
            let mut booking = doc(input);
            apply_default_status(&mut booking);
            assert_eq!(booking["status"], json!("pending"));
        }

        let mut confirmed = doc(json!({"status": "confirmed"}));
        apply_default_status(&mut confirmed);
        assert_eq!(confirmed["status"], json!("confirmed"));
    }
}
