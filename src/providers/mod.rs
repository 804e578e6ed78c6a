//! Outbound providers.
//!
//! Two layers live here. Vendor clients (`openai_compat`, `clipdrop`,
//! `cloudinary`, `pdf`) own transport details and implement the narrow client
//! traits below. Capability adapters (`text`, `image`, `document`) compose
//! those clients into the operations the gateway exposes and all implement
//! [`Capability`], so the creation service only ever sees [`AdapterError`].

pub mod clipdrop;
pub mod cloudinary;
pub mod document;
pub mod image;
pub mod openai_compat;
pub mod pdf;
pub mod text;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

pub use clipdrop::ClipdropClient;
pub use cloudinary::CloudinaryClient;
pub use document::{ResumeReview, MAX_RESUME_BYTES};
pub use image::{BackgroundRemoval, ImageGeneration, ObjectRemoval, ObjectRemovalInput};
pub use openai_compat::OpenAiCompatibleClient;
pub use pdf::PdfTextExtractor;
pub use text::{TextGeneration, TokenBudget};

/// Normalized vendor failure
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} is not configured: missing {setting}")]
    NotConfigured {
        provider: &'static str,
        setting: &'static str,
    },

    #[error("{provider} request timed out")]
    Timeout { provider: &'static str },

    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unusable response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout { provider }
        } else {
            ProviderError::Transport {
                provider,
                message: err.to_string(),
            }
        }
    }

    pub fn invalid(provider: &'static str, message: impl Into<String>) -> Self {
        ProviderError::InvalidResponse {
            provider,
            message: message.into(),
        }
    }

    /// Turn a non-success response into a `Status` error, passing others through
    pub async fn check_status(
        provider: &'static str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Status {
            provider,
            status: status.as_u16(),
            body,
        })
    }
}

/// Failure of a capability adapter
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Input rejected before any outbound call was made
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl AdapterError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdapterError::Validation(message.into())
    }
}

/// One gateway capability: validate the input, call the vendor(s), return a
/// canonical output.
#[async_trait]
pub trait Capability: Send + Sync {
    type Input: Send + 'static;
    type Output: Send;

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output, AdapterError>;
}

/// A file received in a multipart upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A chat completion request with a single user message
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

/// Sampling temperature used for every completion
pub const TEMPERATURE: f32 = 0.7;

#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

#[async_trait]
pub trait ImageSynthesis: Send + Sync {
    /// Raw image bytes (PNG) for a prompt
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Media transform applied by the storage backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformation {
    RemoveBackground,
    RemoveObject(String),
}

/// An image held by the media storage backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub public_id: String,
    pub secure_url: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload image bytes, optionally transforming them on ingestion
    async fn upload(
        &self,
        image: Bytes,
        transformation: Option<Transformation>,
    ) -> Result<StoredMedia, ProviderError>;

    /// Delivery URL applying a transform to an already stored image
    fn transformed_url(&self, public_id: &str, transformation: &Transformation) -> String;
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, document: Bytes) -> Result<String, ProviderError>;
}
