// handlers/protected/ai/text.rs - text completion endpoints

use axum::extract::{rejection::JsonRejection, Extension, Json, State};
use serde::Deserialize;
use serde_json::Value;

use crate::middleware::{ApiResult, AuthContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ArticleRequest {
    #[serde(default)]
    pub prompt: String,
    /// Requested token budget; numbers and numeric strings are accepted
    #[serde(default)]
    pub length: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct BlogTitleRequest {
    #[serde(default)]
    pub prompt: String,
}

/// POST /api/ai/generate-article
pub async fn generate_article(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<ArticleRequest>, JsonRejection>,
) -> ApiResult<String> {
    let Json(body) = payload?;

    Ok(state
        .creations
        .generate_article(&auth, body.prompt, body.length.as_ref())
        .await
        .into())
}

/// POST /api/ai/generate-blog-title
pub async fn generate_blog_title(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<BlogTitleRequest>, JsonRejection>,
) -> ApiResult<String> {
    let Json(body) = payload?;

    Ok(state
        .creations
        .generate_blog_title(&auth, body.prompt)
        .await
        .into())
}
