use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;

pub use extractors::AuthUser;

/// Name of the cookie carrying the signed token.
pub const TOKEN_COOKIE: &str = "token";

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
