// handlers/protected/ai/resume.rs - POST /api/ai/resume-review

use axum::extract::{Extension, Multipart, State};

use crate::middleware::{ApiResult, AuthContext};
use crate::state::AppState;

use super::multipart::MultipartForm;

/// POST /api/ai/resume-review - multipart `resume` (PDF)
pub async fn review_resume(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<String> {
    let mut form = MultipartForm::read(multipart).await?;

    Ok(state
        .creations
        .review_resume(&auth, form.take_file("resume"))
        .await
        .into())
}
