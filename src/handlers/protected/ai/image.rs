// handlers/protected/ai/image.rs - image endpoints

use axum::extract::{rejection::JsonRejection, Extension, Json, Multipart, State};
use serde::Deserialize;

use crate::middleware::{ApiResult, AuthContext};
use crate::state::AppState;

use super::multipart::MultipartForm;

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub publish: bool,
}

/// POST /api/ai/generate-image
pub async fn generate_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> ApiResult<String> {
    let Json(body) = payload?;

    Ok(state
        .creations
        .generate_image(&auth, body.prompt, body.publish)
        .await
        .into())
}

/// POST /api/ai/remove-image-background - multipart `image`
pub async fn remove_background(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<String> {
    let mut form = MultipartForm::read(multipart).await?;

    Ok(state
        .creations
        .remove_background(&auth, form.take_file("image"))
        .await
        .into())
}

/// POST /api/ai/remove-image-object - multipart `image` and `object`
pub async fn remove_object(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<String> {
    let mut form = MultipartForm::read(multipart).await?;
    let image = form.take_file("image");
    let object = form.take_field("object");

    Ok(state
        .creations
        .remove_object(&auth, image, object)
        .await
        .into())
}
