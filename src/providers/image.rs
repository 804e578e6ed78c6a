use async_trait::async_trait;
use axum::body::Bytes;
use std::sync::Arc;

use super::{AdapterError, Capability, ImageSynthesis, MediaStore, Transformation, UploadedFile};

const NO_IMAGE: &str = "No image file provided";
const NO_OBJECT: &str = "No object specified for removal";

/// Prompt -> synthesized image -> hosted URL
pub struct ImageGeneration {
    synthesis: Arc<dyn ImageSynthesis>,
    media: Arc<dyn MediaStore>,
}

impl ImageGeneration {
    pub fn new(synthesis: Arc<dyn ImageSynthesis>, media: Arc<dyn MediaStore>) -> Self {
        Self { synthesis, media }
    }
}

#[async_trait]
impl Capability for ImageGeneration {
    type Input = String;
    type Output = String;

    async fn invoke(&self, prompt: String) -> Result<String, AdapterError> {
        if prompt.trim().is_empty() {
            return Err(AdapterError::validation("Prompt is required"));
        }

        let image = self.synthesis.synthesize(&prompt).await?;
        let stored = self.media.upload(Bytes::from(image), None).await?;
        Ok(stored.secure_url)
    }
}

/// Uploaded image -> background removed on ingestion -> hosted URL
pub struct BackgroundRemoval {
    media: Arc<dyn MediaStore>,
}

impl BackgroundRemoval {
    pub fn new(media: Arc<dyn MediaStore>) -> Self {
        Self { media }
    }
}

#[async_trait]
impl Capability for BackgroundRemoval {
    type Input = Option<UploadedFile>;
    type Output = String;

    async fn invoke(&self, image: Option<UploadedFile>) -> Result<String, AdapterError> {
        let image = image
            .filter(|file| !file.is_empty())
            .ok_or_else(|| AdapterError::validation(NO_IMAGE))?;

        let stored = self
            .media
            .upload(image.bytes, Some(Transformation::RemoveBackground))
            .await?;
        Ok(stored.secure_url)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObjectRemovalInput {
    pub image: Option<UploadedFile>,
    pub object: Option<String>,
}

/// Uploaded image + object label -> delivery URL with generative removal
pub struct ObjectRemoval {
    media: Arc<dyn MediaStore>,
}

impl ObjectRemoval {
    pub fn new(media: Arc<dyn MediaStore>) -> Self {
        Self { media }
    }
}

#[async_trait]
impl Capability for ObjectRemoval {
    type Input = ObjectRemovalInput;
    type Output = String;

    async fn invoke(&self, input: ObjectRemovalInput) -> Result<String, AdapterError> {
        let image = input
            .image
            .filter(|file| !file.is_empty())
            .ok_or_else(|| AdapterError::validation(NO_IMAGE))?;
        let object = input
            .object
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .ok_or_else(|| AdapterError::validation(NO_OBJECT))?;

        let stored = self.media.upload(image.bytes, None).await?;
        Ok(self
            .media
            .transformed_url(&stored.public_id, &Transformation::RemoveObject(object)))
    }
}
