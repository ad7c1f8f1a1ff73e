use axum::http::HeaderValue;
use sea_orm::Database;
use tracing::info;

use shopfront_api::config::AppConfig;
use shopfront_api::infra::db::DbRepositories;
use shopfront_api::infra::password::PasswordHasher;
use shopfront_api::infra::upload::DiskImageStore;
use shopfront_api::router::build_router;
use shopfront_api::state::AppState;
use shopfront_api::usecase::token::TokenService;
use shopfront_auth_types::cookie::CookiePolicy;
use shopfront_core::error::set_expose_internal_errors;
use shopfront_core::health::mark_started;
use shopfront_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();
    mark_started();

    let config = AppConfig::from_env();
    let production = config.environment.is_production();
    set_expose_internal_errors(!production);

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let images = DiskImageStore::new(&config.upload_dir);
    images
        .ensure_dir()
        .await
        .expect("failed to create upload directory");

    let state = AppState {
        repos: DbRepositories { db },
        tokens: TokenService::new(
            config.access_secret,
            config.refresh_secret,
            config.identity_secret,
        ),
        passwords: PasswordHasher::new(config.bcrypt_cost),
        cookies: CookiePolicy {
            secure: production,
            domain: config.cookie_domain,
        },
        images,
        cors_origin: HeaderValue::from_str(&config.cors_origin).expect("invalid CORS_ORIGIN"),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(upload_dir = %config.upload_dir, production, "api listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
