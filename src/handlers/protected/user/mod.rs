// handlers/protected/user/mod.rs - read-only creation listings

use axum::extract::{Extension, State};

use crate::database::models::Creation;
use crate::middleware::{ApiResponse, ApiResult, AuthContext};
use crate::state::AppState;

/// GET /api/user/get-user-creations - caller's creations, newest first
pub async fn user_creations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Vec<Creation>> {
    let creations = state.creations.user_creations(&auth).await?;
    Ok(ApiResponse::success(creations))
}

/// GET /api/user/get-published-creations - published creations, newest first
pub async fn published_creations(State(state): State<AppState>) -> ApiResult<Vec<Creation>> {
    let creations = state.creations.published_creations().await?;
    Ok(ApiResponse::success(creations))
}
