use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::UserModel;
use crate::response::ApiResponse;
use crate::services::auth::AuthService;
use anyhow::anyhow;
use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Email address
    #[validate(email)]
    pub email: String,
    /// Username (3-50 characters)
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// Password (min 8 characters)
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address
    #[validate(email)]
    pub email: String,
    /// User password
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Session token (JWT)
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// User role (user, admin)
    pub role: String,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error or duplicate account", body = AppError),
    ),
    tag = "auth"
)]
pub async fn signup(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let service = AuthService::new(db);
    let (user, token) = service
        .signup(&payload.email, &payload.username, &payload.password)
        .await?;

    let response = AuthResponse {
        token: token.clone(),
        user: UserResponse::from(user),
    };

    let mut http_response = ApiResponse::ok(response).into_response();
    set_auth_cookie(&mut http_response, &token)?;
    Ok(http_response)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let service = AuthService::new(db);
    let (user, token) = service.login(&payload.email, &payload.password).await?;

    let response = AuthResponse {
        token: token.clone(),
        user: UserResponse::from(user),
    };

    let mut http_response = ApiResponse::ok(response).into_response();
    set_auth_cookie(&mut http_response, &token)?;
    Ok(http_response)
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "auth"
)]
pub async fn get_current_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let service = AuthService::new(db);
    let user = service.get_user_by_id(auth_user.user_id).await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    security(("jwt_token" = [])),
    responses(
        (status = 200, description = "Logout successful", body = String),
    ),
    tag = "auth"
)]
pub async fn logout() -> AppResult<impl IntoResponse> {
    let mut response = ApiResponse::ok("Logout successful").into_response();
    append_set_cookie(&mut response, &crate::utils::cookie::build_clear_cookie())?;
    Ok(response)
}

fn set_auth_cookie(response: &mut Response, token: &str) -> AppResult<()> {
    let cookie = crate::utils::cookie::build_auth_cookie(
        token,
        crate::utils::jwt::token_expiry_seconds(),
    );
    append_set_cookie(response, &cookie)
}

fn append_set_cookie(response: &mut Response, cookie_value: &str) -> AppResult<()> {
    let value = HeaderValue::from_str(cookie_value).map_err(|e| {
        AppError::Internal(anyhow!("Failed to build Set-Cookie header value: {}", e))
    })?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}
