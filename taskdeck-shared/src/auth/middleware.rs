/// Identity extraction primitives for bearer authentication
///
/// This module provides the building blocks the API's authentication layer
/// is assembled from: parsing the `Authorization: Bearer <token>` header and
/// the [`AuthContext`] that is inserted into request extensions once a token
/// has been validated.
///
/// # Request Extensions
///
/// After successful authentication the middleware adds:
/// - `AuthContext`: the authenticated user's id and email
///
/// Handlers take the identity exclusively from this context. Nothing
/// downstream of the authentication layer trusts a client-supplied user id.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap};
/// use taskdeck_shared::auth::middleware::bearer_token;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
///
/// assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;

/// Error type for credential extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("{0}")]
    InvalidFormat(String),
}

/// Authentication context added to request extensions
///
/// Built from validated token claims; handlers extract it with Axum's
/// `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskdeck_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} <{}>", auth.user_id, auth.email)
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Authenticated user email
    pub email: String,
}

impl AuthContext {
    /// Creates the auth context from validated token claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.sub.clone(),
        }
    }
}

/// Extracts the bearer token from request headers
///
/// # Arguments
///
/// * `headers` - Request header map
///
/// # Returns
///
/// The token portion of an `Authorization: Bearer <token>` header
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if the header is absent or not valid UTF-8
/// - `AuthError::InvalidFormat` if the header does not use the `Bearer` scheme
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "user@example.com".to_string(), Duration::minutes(30));

        let context = AuthContext::from_claims(&claims);

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.email, "user@example.com");
    }

    #[test]
    fn test_bearer_token_extracts_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer my.jwt.token".parse().unwrap());

        let token = bearer_token(&headers).expect("Should extract token");
        assert_eq!(token, "my.jwt.token");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();

        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_bearer_token_scheme_is_case_sensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "bearer my.jwt.token".parse().unwrap());

        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_bearer_token_bare_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer".parse().unwrap());

        let result = bearer_token(&headers);
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }
}
