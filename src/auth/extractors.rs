use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys, TOKEN_COOKIE};
use crate::error::ApiError;

/// Verified identity taken from the `token` cookie.
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = jar.get(TOKEN_COOKIE).map(|c| c.value().to_owned()) else {
            warn!(uri = %parts.uri, "missing token cookie");
            return Err(ApiError::Unauthorized);
        };

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|e| {
            warn!(error = %e, uri = %parts.uri, "invalid or expired token");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser(claims))
    }
}
