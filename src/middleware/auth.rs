use crate::{
    error::AppError,
    utils::{
        cookie::{extract_cookie, AUTH_TOKEN_COOKIE},
        jwt::{decode_token, Claims},
    },
};
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Authenticated user, decoded from the session token. Sessions are stateless:
/// everything needed to authorize a request rides in the claims.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;
        Ok(Self {
            user_id,
            email: claims.email,
            username: claims.username,
            role: claims.role,
        })
    }
}

/// A user may edit or delete a solution iff they authored it or hold the
/// admin role. Authorless (anonymous) solutions are admin-only.
pub fn can_edit_solution(user: &AuthUser, author_id: Option<i32>) -> bool {
    if user.is_admin() {
        return true;
    }
    author_id == Some(user.user_id)
}

/// Session middleware for protected routes.
///
/// Verifies the JWT from the Authorization header (or the HttpOnly cookie)
/// and adds the decoded user to request extensions.
pub async fn auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = user_from_headers(&headers).ok_or(AppError::Unauthorized)?;
    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

fn user_from_headers(headers: &HeaderMap) -> Option<AuthUser> {
    // Prefer Authorization: Bearer, fallback to HttpOnly cookie.
    let token = extract_bearer_token(headers)
        .or_else(|| extract_cookie(headers, AUTH_TOKEN_COOKIE))?;
    let claims = decode_token(&token).ok()?;
    AuthUser::try_from(claims).ok()
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Extractor for AuthUser from request extensions (set by `auth_middleware`).
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Optional authentication for routes that serve both visitors and users,
/// e.g. anonymous solution submission. Decodes the token straight from the
/// headers; absence or an invalid token yields `None` instead of 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(user_from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32, role: &str) -> AuthUser {
        AuthUser {
            user_id: id,
            email: format!("u{id}@example.com"),
            username: format!("u{id}"),
            role: role.to_string(),
        }
    }

    #[test]
    fn author_can_edit_own_solution() {
        assert!(can_edit_solution(&user(1, "user"), Some(1)));
    }

    #[test]
    fn other_user_cannot_edit() {
        assert!(!can_edit_solution(&user(2, "user"), Some(1)));
    }

    #[test]
    fn admin_can_edit_any_solution() {
        assert!(can_edit_solution(&user(2, "admin"), Some(1)));
    }

    #[test]
    fn regular_user_cannot_edit_authorless_solution() {
        assert!(!can_edit_solution(&user(1, "user"), None));
    }

    #[test]
    fn admin_can_edit_authorless_solution() {
        assert!(can_edit_solution(&user(1, "admin"), None));
    }

    #[test]
    fn unknown_role_is_not_admin() {
        assert!(!can_edit_solution(&user(2, "moderator"), Some(1)));
    }

    #[test]
    fn claims_with_bad_sub_rejected() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            email: "a@b.com".to_string(),
            username: "a".to_string(),
            role: "user".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(AuthUser::try_from(claims).is_err());
    }
}
