use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Plan;

/// Authenticated caller, resolved once per request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    pub plan: Plan,
    /// Free-usage counter as read from the identity provider for this request
    pub free_usage: u32,
}

/// Validates the bearer token, reads the caller's free-usage counter and
/// injects an [`AuthContext`] into the request extensions.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token, &state.config.security)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let plan = claims.plan();
    let free_usage = if plan.is_premium() {
        0
    } else {
        state.identity.free_usage(&claims.sub).await?
    };

    tracing::debug!(user_id = %claims.sub, plan = plan.as_str(), free_usage, "authenticated");

    request.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        plan,
        free_usage,
    });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
