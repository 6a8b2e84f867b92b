mod config;
mod error;
mod handlers;
mod middleware;
mod migration;
mod models;
mod response;
mod routes;
mod services;
mod utils;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Auth routes
        crate::handlers::auth::signup,
        crate::handlers::auth::login,
        crate::handlers::auth::get_current_user,
        crate::handlers::auth::logout,
        // Solution routes
        crate::handlers::solution::list_solutions,
        crate::handlers::solution::get_solution,
        crate::handlers::solution::create_solution,
        crate::handlers::solution::update_solution,
        crate::handlers::solution::delete_solution,
        // Reaction routes
        crate::handlers::reaction::toggle_reaction,
        crate::handlers::reaction::list_reactions,
        // Draft routes
        crate::handlers::draft::save_draft,
        crate::handlers::draft::list_drafts,
        crate::handlers::draft::delete_draft,
    ),
    components(
        schemas(
            crate::response::ApiResponse<serde_json::Value>,
            crate::response::Pagination,
            crate::error::AppError,
            // Auth
            crate::handlers::auth::SignupRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::AuthResponse,
            crate::handlers::auth::UserResponse,
            // Solutions
            crate::handlers::solution::SolutionRequest,
            crate::handlers::solution::SolutionResponse,
            crate::handlers::solution::SolutionListResponse,
            crate::handlers::solution::AuthorResponse,
            crate::handlers::solution::ListSolutionsQuery,
            // Reactions
            crate::handlers::reaction::ToggleReactionRequest,
            crate::handlers::reaction::ToggleReactionResponse,
            crate::handlers::reaction::ReactionEntry,
            crate::handlers::reaction::ReactionListResponse,
            // Drafts
            crate::handlers::draft::SaveDraftRequest,
            crate::handlers::draft::DraftResponse,
        )
    ),
    tags(
        (name = "auth", description = "Authentication operations"),
        (name = "solutions", description = "Solution sharing operations"),
        (name = "reactions", description = "Solution reaction operations"),
        (name = "drafts", description = "Draft autosave operations"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "solvehub=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration before doing anything else
    let jwt_config = validate_config()?;
    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting SolveHub API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database().await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    services::bootstrap_admin::ensure_bootstrap_admin(&db).await?;

    let app = create_app().layer(Extension(db));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<crate::config::jwt::JwtConfig> {
    // JWT config — validated and cached
    let jwt_config = config::jwt::JwtConfig::from_env()?;

    // DATABASE_URL — checked here for early error; actual connection happens later
    if env::var("DATABASE_URL").is_err() {
        return Err(anyhow::anyhow!(
            "DATABASE_URL environment variable must be set"
        ));
    }

    Ok(jwt_config)
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app() -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(
            middleware::security::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "SolveHub API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
