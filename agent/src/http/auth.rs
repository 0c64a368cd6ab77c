//! Bearer-token authentication.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::http::AppState;
use crate::http::error::ApiError;

/// The agent's single shared secret. Compared in constant time; never
/// printed by `Debug`.
#[derive(Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    #[must_use]
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    /// Whether an `Authorization` header value carries this secret.
    #[must_use]
    pub fn authorizes(&self, header: Option<&str>) -> bool {
        let Some(token) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
            return false;
        };
        token.as_bytes().ct_eq(self.0.as_bytes()).into()
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

/// Reject any request without the correct bearer token before routing.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if !state.secret.authorizes(header) {
        tracing::warn!(method = %request.method(), path = %request.uri().path(), "unauthorized request");
        return ApiError::Unauthorized.into_response();
    }

    tracing::info!(method = %request.method(), path = %request.uri().path(), "request");
    next.run(request).await
}
