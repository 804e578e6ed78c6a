use async_trait::async_trait;
use axum::body::Bytes;

use super::{DocumentExtractor, ProviderError};

const PROVIDER: &str = "document extraction";

/// Extracts plain text from PDF documents on the blocking pool
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor;

#[async_trait]
impl DocumentExtractor for PdfTextExtractor {
    async fn extract_text(&self, document: Bytes) -> Result<String, ProviderError> {
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&document))
            .await
            .map_err(|e| ProviderError::Transport {
                provider: PROVIDER,
                message: e.to_string(),
            })?
            .map_err(|e| ProviderError::invalid(PROVIDER, e.to_string()))?;

        if text.trim().is_empty() {
            return Err(ProviderError::invalid(PROVIDER, "document contains no extractable text"));
        }
        Ok(text)
    }
}
