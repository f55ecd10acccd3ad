use std::convert::Infallible;
use std::fmt;

use axum::extract::{FromRequestParts, Request};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::validation::{MAX_TOKEN_LENGTH, MIN_TOKEN_LENGTH, is_valid_token};

/// Token taken from a valid `Authorization: Bearer` header, stored in request
/// extensions for handlers that want it.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

/// Token forwarded by the gate, `None` when the gate is disabled.
pub struct Caller(pub Option<BearerToken>);

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(parts.extensions.get::<BearerToken>().cloned()))
    }
}

fn unauthorized(msg: &str) -> ApiError {
    ApiError::Unauthorized(msg.to_string())
}

pub fn verify_bearer(headers: &HeaderMap) -> Result<BearerToken, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("authorization header is required"))?;
    let value = header
        .to_str()
        .map_err(|_| unauthorized("invalid authorization header format"))?;

    let token = match value.split_once(' ') {
        Some(("Bearer", token)) => token.trim(),
        _ => return Err(unauthorized("invalid authorization header format")),
    };

    if !(MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&token.len()) {
        return Err(unauthorized("invalid token length"));
    }
    if !is_valid_token(token) {
        return Err(unauthorized("invalid token format"));
    }
    Ok(BearerToken(token.to_string()))
}

/// Middleware gating the API routes on a well-formed bearer token.
pub async fn require_bearer(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let token = verify_bearer(req.headers())?;
    req.extensions_mut().insert(token);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn rejection(headers: &HeaderMap) -> String {
        match verify_bearer(headers) {
            Err(ApiError::Unauthorized(msg)) => msg,
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_bearer_valid() {
        let token = verify_bearer(&headers("Bearer valid_token_123456")).unwrap();
        assert_eq!(token, BearerToken("valid_token_123456".into()));
    }

    #[test]
    fn test_verify_bearer_trims_token() {
        let token = verify_bearer(&headers("Bearer  valid_token_123456 ")).unwrap();
        assert_eq!(token.0, "valid_token_123456");
    }

    #[test]
    fn test_verify_bearer_missing_header() {
        assert_eq!(rejection(&HeaderMap::new()), "authorization header is required");
    }

    #[test]
    fn test_verify_bearer_wrong_scheme() {
        assert_eq!(
            rejection(&headers("Bad token_123456789")),
            "invalid authorization header format"
        );
        assert_eq!(
            rejection(&headers("Bearer")),
            "invalid authorization header format"
        );
        assert_eq!(
            rejection(&headers("Basic dXNlcjpwYXNzd29yZA==")),
            "invalid authorization header format"
        );
    }

    #[test]
    fn test_verify_bearer_length_bounds() {
        assert_eq!(rejection(&headers("Bearer short")), "invalid token length");
        let long = format!("Bearer {}", "a".repeat(MAX_TOKEN_LENGTH + 1));
        assert_eq!(rejection(&headers(&long)), "invalid token length");
    }

    #[test]
    fn test_verify_bearer_bad_characters() {
        assert_eq!(
            rejection(&headers("Bearer token/with+slashes")),
            "invalid token format"
        );
    }

    #[tokio::test]
    async fn test_caller_reads_forwarded_token() {
        let mut request = axum::http::Request::new(());
        request
            .extensions_mut()
            .insert(BearerToken("valid_token_123456".into()));
        let (mut parts, ()) = request.into_parts();
        let caller = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(caller.is_authenticated());

        let (mut parts, ()) = axum::http::Request::new(()).into_parts();
        let caller = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(!caller.is_authenticated());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = BearerToken("valid_token_123456".into());
        assert_eq!(format!("{token:?}"), "BearerToken(..)");
    }
}
