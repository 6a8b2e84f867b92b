#![allow(dead_code)]

use reqwest::Client;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Once,
};

static INIT: Once = Once::new();
static MIGRATIONS_RAN: AtomicBool = AtomicBool::new(false);

fn init_env() {
    INIT.call_once(|| {
        dotenv::dotenv().ok();
        std::env::set_var(
            "JWT_SECRET",
            "integration_test_secret_that_is_at_least_32_characters_long",
        );
        std::env::set_var("RATE_LIMIT_ENABLED", "false");
        let config = solvehub::config::jwt::JwtConfig::from_env().unwrap();
        let _ = solvehub::utils::jwt::init_jwt_config(config);
    });
}

pub struct TestApp {
    pub addr: String,
    pub db: DatabaseConnection,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.addr, path)
    }
}

pub async fn spawn_app() -> TestApp {
    init_env();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));

    let db = sea_orm::Database::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    // Run migrations only once globally (using atomic bool for thread safety)
    if !MIGRATIONS_RAN.swap(true, Ordering::SeqCst) {
        solvehub::migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
    }

    // Clean data tables (reverse dependency order)
    cleanup_tables(&db).await;

    let app = axum::Router::new()
        .route("/", axum::routing::get(|| async { "ok" }))
        .merge(solvehub::routes::create_routes())
        .layer(axum::middleware::from_fn(
            solvehub::middleware::security::security_headers_middleware,
        ))
        .layer(axum::extract::Extension(db.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    let addr_str = format!("http://{}", addr);
    let client = Client::new();

    TestApp {
        addr: addr_str,
        db,
        client,
    }
}

async fn cleanup_tables(db: &DatabaseConnection) {
    let tables = ["drafts", "reactions", "solutions", "users"];

    for table in tables {
        let sql = format!("TRUNCATE TABLE {} CASCADE", table);
        let _ = db
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                sql,
            ))
            .await;
    }
}

/// Sign up a user and return (user_id, token).
pub async fn create_test_user(app: &TestApp, username_prefix: &str) -> (i32, String) {
    static USER_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = USER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let unique_username = format!("{}_{}", username_prefix, counter);

    let resp = app
        .client
        .post(app.url("/auth/signup"))
        .json(&serde_json::json!({
            "username": unique_username,
            "email": format!("{}@test.com", unique_username),
            "password": "test_password_123"
        }))
        .send()
        .await
        .expect("Failed to sign up user");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap_or_else(|e| {
        panic!(
            "Failed to parse signup response for user '{}': status={}, error={}",
            unique_username, status, e
        );
    });

    if !body["success"].as_bool().unwrap_or(false) {
        panic!(
            "Failed to sign up user '{}': status={}, body={}",
            unique_username, status, body
        );
    }

    let user_id = body["data"]["user"]["id"]
        .as_i64()
        .unwrap_or_else(|| panic!("Response missing user id for '{}': {:?}", unique_username, body))
        as i32;
    let token = body["data"]["token"]
        .as_str()
        .unwrap_or_else(|| panic!("Response missing token for '{}': {:?}", unique_username, body))
        .to_string();
    (user_id, token)
}

/// Post a solution and return its id.
pub async fn create_test_solution(app: &TestApp, token: &str, problem_code: &str) -> i32 {
    let resp = app
        .client
        .post(app.url("/solutions"))
        .bearer_auth(token)
        .json(&serde_json::json!({
            "problem_code": problem_code,
            "title": format!("Solution for {}", problem_code),
            "content": "Sort the array, then sweep once.\n\n```cpp\nint main() {}\n```",
            "is_public": true
        }))
        .send()
        .await
        .expect("Failed to create solution");

    let status = resp.status();
    let body: serde_json::Value = resp.json().await.expect("Failed to parse response");

    if !body["success"].as_bool().unwrap_or(false) {
        panic!("Failed to create solution: status={}, body={}", status, body);
    }

    body["data"]["id"].as_i64().expect("Response missing id") as i32
}

/// Sign up a user, promote them to admin, and log in again so the session
/// token carries the admin role. Returns (user_id, token).
pub async fn create_admin_user(app: &TestApp, username_prefix: &str) -> (i32, String) {
    static ADMIN_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = ADMIN_COUNTER.fetch_add(1, Ordering::SeqCst);
    let username = format!("{}_admin_{}", username_prefix, counter);
    let email = format!("{}@test.com", username);

    let resp = app
        .client
        .post(app.url("/auth/signup"))
        .json(&serde_json::json!({
            "username": username,
            "email": email,
            "password": "test_password_123"
        }))
        .send()
        .await
        .expect("Failed to sign up admin");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse signup response");
    let user_id = body["data"]["user"]["id"].as_i64().expect("missing id") as i32;

    make_admin(&app.db, user_id).await;

    // Role rides in the token, so a fresh login is required after promotion.
    let resp = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({
            "email": email,
            "password": "test_password_123"
        }))
        .send()
        .await
        .expect("Failed to log in admin");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    let token = body["data"]["token"].as_str().expect("missing token").to_string();

    (user_id, token)
}

/// Make a user admin by directly updating the database.
pub async fn make_admin(db: &DatabaseConnection, user_id: i32) {
    db.execute(Statement::from_sql_and_values(
        sea_orm::DatabaseBackend::Postgres,
        "UPDATE users SET role = 'admin' WHERE id = $1",
        vec![user_id.into()],
    ))
    .await
    .expect("Failed to make user admin");
}
