use async_trait::async_trait;
use std::sync::Arc;

use super::{
    AdapterError, Capability, CompletionRequest, DocumentExtractor, TextCompletion, TokenBudget,
    UploadedFile,
};

/// Largest resume accepted for review (5 MiB)
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const REVIEW_TEMPLATE: &str = "Review the following resume and provide constructive feedback on its strengths, weaknesses, and areas for improvement. Resume Content:\n\n";

/// Uploaded resume -> extracted text -> review completion
pub struct ResumeReview {
    extractor: Arc<dyn DocumentExtractor>,
    text: Arc<dyn TextCompletion>,
}

impl ResumeReview {
    pub fn new(extractor: Arc<dyn DocumentExtractor>, text: Arc<dyn TextCompletion>) -> Self {
        Self { extractor, text }
    }

    pub fn review_prompt(resume_text: &str) -> String {
        format!("{}{}", REVIEW_TEMPLATE, resume_text)
    }
}

#[async_trait]
impl Capability for ResumeReview {
    type Input = Option<UploadedFile>;
    type Output = String;

    async fn invoke(&self, resume: Option<UploadedFile>) -> Result<String, AdapterError> {
        let resume = resume
            .filter(|file| !file.is_empty())
            .ok_or_else(|| AdapterError::validation("Resume file not provided"))?;

        if resume.size() > MAX_RESUME_BYTES {
            return Err(AdapterError::validation(
                "Resume file size exceeds allowed size (5MB).",
            ));
        }

        let text = self.extractor.extract_text(resume.bytes).await?;

        Ok(self
            .text
            .complete(CompletionRequest {
                prompt: Self::review_prompt(&text),
                max_tokens: TokenBudget::RESUME_REVIEW,
            })
            .await?)
    }
}
