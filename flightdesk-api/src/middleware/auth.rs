use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use flightdesk_core::identity::Principal;
use flightdesk_core::Role;

use crate::state::AppState;

// ============================================================================
// Bearer authentication
// ============================================================================

/// Attaches a [`Principal`] when the bearer token belongs to a live account.
/// Never rejects by itself; the role gates decide.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    if let Some(token) = token {
        if let Some(principal) = state.auth.authenticate(&token).await {
            req.extensions_mut().insert(principal);
        }
    }

    next.run(req).await
}

// ============================================================================
// Role gates
// ============================================================================

fn check(req: &Request, roles: &[Role]) -> Result<(), StatusCode> {
    match req.extensions().get::<Principal>() {
        Some(principal) if principal.has_any_role(roles) => Ok(()),
        Some(principal) => {
            tracing::debug!("{} lacks any of {:?}", principal.username, roles);
            Err(StatusCode::FORBIDDEN)
        }
        None => Err(StatusCode::FORBIDDEN),
    }
}

pub async fn require_user(req: Request, next: Next) -> Result<Response, StatusCode> {
    check(&req, &[Role::User, Role::Admin])?;
    Ok(next.run(req).await)
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    check(&req, &[Role::Admin])?;
    Ok(next.run(req).await)
}
