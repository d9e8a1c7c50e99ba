use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use tienda_backend::auth::{AuthApiState, AuthService, TokenService, auth_api_router};
use tienda_backend::config::Config;
use tienda_backend::db::{self, DbConfig, ProductRepository, UserRepository};
use tienda_backend::error::AppError;
use tienda_backend::products::{ProductApiState, product_api_router};
use tienda_backend::users::{UserApiState, user_api_router};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /health
/// Liveness plus database reachability
async fn health_handler(State(pool): State<PgPool>) -> Result<Json<HealthResponse>, AppError> {
    db::health_check(&pool)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(HealthResponse { status: "ok" }))
}

#[tokio::main]
async fn main() {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load application config from environment variables
    let config = Config::from_env();

    // Log config status (without revealing secrets)
    tracing::info!(
        "Config loaded: database={}, jwt_secret={}",
        config.has_database(),
        config.has_jwt_secret()
    );

    // Connect the bounded pool and bring the schema up to date
    let db_config = DbConfig {
        database_url: config.database_url_or_panic().to_string(),
        ..Default::default()
    };
    let pool = db::create_pool_with_migrations(&db_config)
        .await
        .expect("failed to connect to database");

    let token_service = TokenService::from_env().expect("JWT_SECRET must be set");

    let user_repo = UserRepository::new(pool.clone());
    let product_repo = ProductRepository::new(pool.clone());
    let auth_service = AuthService::new(user_repo.clone(), token_service.clone());

    // Build the application router; each resource owns its state
    let app = Router::new()
        .merge(auth_api_router(AuthApiState {
            auth_service,
            token_service: token_service.clone(),
        }))
        .merge(product_api_router(ProductApiState {
            product_repo,
            token_service: token_service.clone(),
        }))
        .merge(user_api_router(UserApiState {
            user_repo,
            token_service,
        }))
        .merge(
            Router::new()
                .route("/health", get(health_handler))
                .with_state(pool),
        )
        // The storefront SPA is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr_or_default().to_string();
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
