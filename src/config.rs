use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub production: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = database_url_from_env()?;
        let jwt = JwtConfig {
            secret: std::env::var("ACCESS_TOKEN_SECRET").context("ACCESS_TOKEN_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "home-service".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "home-service-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse::<u16>().with_context(|| format!("invalid PORT {v:?}"))?,
            Err(_) => 5000,
        };
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| vec!["http://localhost:5173".to_string()]);
        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            allowed_origins,
            production,
        })
    }
}

/// `DATABASE_URL` wins; otherwise the URL is assembled from `DB_USER`/`DB_PASS`.
fn database_url_from_env() -> anyhow::Result<String> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }
    let user = std::env::var("DB_USER").context("neither DATABASE_URL nor DB_USER is set")?;
    let pass = std::env::var("DB_PASS").context("DB_PASS is not set")?;
    let host = std::env::var("DB_HOST").unwrap_or_else(|_| "localhost:5432".into());
    let name = std::env::var("DB_NAME").unwrap_or_else(|_| "homeService".into());
    Ok(format!("postgres://{user}:{pass}@{host}/{name}"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}
