use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api/v1", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    let public_read = public_routes(&rate_limit_config);
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    auth.merge(public_read).merge(protected)
}

/// Auth routes: signup and login. Throttled hardest, both do bcrypt work.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/signup", routing::post(handlers::signup))
        .route("/auth/login", routing::post(handlers::login));

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Public routes: solution browsing and submission. Submission stays public
/// so visitors can post anonymously; the handler picks up a token if present.
fn public_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route(
            "/solutions",
            routing::get(handlers::list_solutions).post(handlers::create_solution),
        )
        .route("/solutions/{id}", routing::get(handlers::get_solution));

    with_optional_rate_limit(router, config.enabled, config.public_read)
}

/// Protected routes: everything that needs a session.
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/me", routing::get(handlers::get_current_user))
        .route("/auth/logout", routing::post(handlers::logout))
        .route(
            "/solutions/{id}",
            routing::put(handlers::update_solution).delete(handlers::delete_solution),
        )
        .route(
            "/solutions/{id}/reactions",
            routing::post(handlers::toggle_reaction).get(handlers::list_reactions),
        )
        .route(
            "/drafts",
            routing::post(handlers::save_draft).get(handlers::list_drafts),
        )
        .route("/drafts/{id}", routing::delete(handlers::delete_draft));

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
