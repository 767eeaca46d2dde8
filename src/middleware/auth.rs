use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{decode_token, Claims};
use crate::error::ApiError;

/// Authenticated user context extracted from a JWT
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Decodes a bearer token when one is present and stores `AuthUser` in the
/// request extensions. Missing or bad tokens are not an error here; the
/// guards below decide per route.
pub async fn authenticate_jwt(mut request: Request, next: Next) -> Response {
    let decoded = extract_jwt_from_headers(request.headers()).map(decode_token);
    match decoded {
        Some(Ok(claims)) => {
            request.extensions_mut().insert(AuthUser::from(claims));
        }
        Some(Err(e)) => tracing::debug!("Ignoring unusable token: {}", e),
        None => {}
    }

    next.run(request).await
}

fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Any valid token.
pub fn ensure_logged_in(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    user.ok_or_else(|| ApiError::unauthorized("Unauthorized"))
}

/// Token must carry `isAdmin`.
pub fn ensure_admin(user: Option<&AuthUser>) -> Result<&AuthUser, ApiError> {
    match ensure_logged_in(user)? {
        u if u.is_admin => Ok(u),
        u => {
            tracing::warn!("Non-admin user '{}' attempted an admin operation", u.username);
            Err(ApiError::unauthorized("Unauthorized"))
        }
    }
}

/// Token must be an admin's or belong to `username`.
pub fn ensure_correct_user_or_admin<'a>(user: Option<&'a AuthUser>, username: &str) -> Result<&'a AuthUser, ApiError> {
    match ensure_logged_in(user)? {
        u if u.is_admin || u.username == username => Ok(u),
        _ => Err(ApiError::unauthorized("Unauthorized")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user(name: &str, is_admin: bool) -> AuthUser {
        AuthUser { username: name.to_string(), is_admin }
    }

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_jwt_from_headers(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_jwt_from_headers(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_jwt_from_headers(&headers), None);
    }

    #[test]
    fn anonymous_requests_fail_every_guard() {
        assert!(ensure_logged_in(None).is_err());
        assert!(ensure_admin(None).is_err());
        assert!(ensure_correct_user_or_admin(None, "u1").is_err());
    }

    #[test]
    fn admin_guard_checks_flag() {
        assert!(ensure_admin(Some(&user("a", true))).is_ok());
        assert!(ensure_admin(Some(&user("u1", false))).is_err());
    }

    #[test]
    fn correct_user_or_admin() {
        assert!(ensure_correct_user_or_admin(Some(&user("u1", false)), "u1").is_ok());
        assert!(ensure_correct_user_or_admin(Some(&user("a", true)), "u1").is_ok());
        assert!(ensure_correct_user_or_admin(Some(&user("u2", false)), "u1").is_err());
    }
}
