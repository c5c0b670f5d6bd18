use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::{error::AppError, middleware::RequestId};

use crate::{error::TransactionError, services::scope, AppState};

/// Scope string of a successfully introspected bearer token.
#[derive(Debug, Clone)]
pub struct GrantedScope(pub String);

/// Protect a route with an opaque bearer token.
///
/// The token must introspect as active and carry at least one
/// `transactionId`-prefixed scope; which transaction it grants is decided by
/// the handler.
pub async fn require_transaction_scope(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| {
            AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
        })?;

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|RequestId(id)| id.as_str());

    let introspected = state
        .introspector
        .introspect(token, request_id)
        .await
        .map_err(TransactionError::from)?;

    if !introspected.active {
        tracing::info!(client_id = ?introspected.client_id, "Rejected inactive token");
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Invalid or expired token"
        )));
    }

    if !scope::has_prefixed_scope(introspected.scope()) {
        tracing::warn!(
            client_id = ?introspected.client_id,
            sub = ?introspected.sub,
            granted_scopes = %introspected.scope(),
            required_prefix = scope::TRANSACTION_SCOPE_PREFIX,
            "Insufficient scopes"
        );
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Insufficient scopes. Required prefix: {}",
            scope::TRANSACTION_SCOPE_PREFIX
        )));
    }

    let granted = GrantedScope(introspected.scope().to_string());
    req.extensions_mut().insert(granted);

    Ok(next.run(req).await)
}

/// Token from an `Authorization` value; the scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for GrantedScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<GrantedScope>().cloned().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Granted scope missing from request extensions"
            ))
        })
    }
}
