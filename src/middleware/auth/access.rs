//! Auth token verification → `AuthCtx` in request extensions.
//!
//! - Extraction, verification and refresh are delegated to `Authenticator::handle_request`.
//! - A refreshed token collected during verification is copied onto the handler's response.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AuthError;
use crate::state::AppState;

/// Require authentication on every route of `router`.
///
/// ```ignore
/// let protected = access::apply(Router::new().route("/me", get(me)), state);
/// let router = Router::new().route("/health", get(health)).merge(protected);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let mut pending = HeaderMap::new();

    let ctx = match state.auth.handle_request(&mut pending, &mut req) {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::warn!(error = %err, code = err.code(), "auth token rejected");
            return Err(err);
        }
    };

    if ctx.refreshed {
        tracing::info!(principal = %ctx.principal, "auth token refreshed");
    }

    let mut response = next.run(req).await;
    for (name, value) in pending.iter() {
        response.headers_mut().append(name.clone(), value.clone());
    }

    Ok(response)
}
