use shopfront_core::config::{Environment, optional, parse_or, require};

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AppConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for access tokens. Env var: `JWT_ACCESS_SECRET`.
    pub access_secret: String,
    /// HMAC secret for refresh tokens. Env var: `JWT_REFRESH_SECRET`.
    pub refresh_secret: String,
    /// HMAC secret for the `userId` identity token. Env var: `JWT_USERID_SECRET`.
    pub identity_secret: String,
    /// TCP port to listen on (default 3000). Env var: `PORT`.
    pub port: u16,
    pub environment: Environment,
    /// Cookie domain attribute; omitted when unset.
    pub cookie_domain: Option<String>,
    /// Where uploaded images are written (default `public/uploads`).
    pub upload_dir: String,
    /// Allowed browser origin (default `http://localhost:5173`).
    pub cors_origin: String,
    /// bcrypt cost factor (default 12).
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: require("DATABASE_URL"),
            access_secret: require("JWT_ACCESS_SECRET"),
            refresh_secret: require("JWT_REFRESH_SECRET"),
            identity_secret: require("JWT_USERID_SECRET"),
            port: parse_or("PORT", 3000),
            environment: Environment::from_env(),
            cookie_domain: optional("COOKIE_DOMAIN"),
            upload_dir: optional("UPLOAD_DIR").unwrap_or_else(|| "public/uploads".to_owned()),
            cors_origin: optional("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_owned()),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
        }
    }
}
