use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, instrument, warn};

use super::{
    dto::{SuccessResponse, TokenRequest},
    jwt::JwtKeys,
    TOKEN_COOKIE,
};
use crate::{error::ApiError, state::AppState};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(issue_token))
        .route("/logout", post(logout))
}

fn token_cookie(value: String, production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(production);
    cookie.set_same_site(if production {
        SameSite::None
    } else {
        SameSite::Strict
    });
    cookie
}

/// POST /jwt { email } → sets the `token` cookie.
#[instrument(skip(state, jar, payload))]
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<TokenRequest>,
) -> Result<(CookieJar, Json<SuccessResponse>), ApiError> {
    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "token requested for invalid email");
        return Err(ApiError::BadRequest("invalid email".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(&email)?;

    debug!(email = %email, "token issued");
    let jar = jar.add(token_cookie(token, state.config.production));
    Ok((jar, Json(SuccessResponse { success: true })))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.remove(token_cookie(String::new(), state.config.production));
    (jar, Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn issued_email_stays_out_of_info_logs() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let request = TokenRequest {
            email: "Someone@Example.com".into(),
        };
        let result = issue_token(State(AppState::fake()), CookieJar::new(), Json(request)).await;
        assert!(result.is_ok());

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(!logs.contains("someone@example.com"), "logs: {logs}");
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn cookie_attributes_follow_environment() {
        let dev = token_cookie("t".into(), false);
        assert_eq!(dev.http_only(), Some(true));
        assert_eq!(dev.secure(), Some(false));
        assert_eq!(dev.same_site(), Some(SameSite::Strict));

        let prod = token_cookie("t".into(), true);
        assert_eq!(prod.secure(), Some(true));
        assert_eq!(prod.same_site(), Some(SameSite::None));
        assert_eq!(prod.path(), Some("/"));
    }
}
