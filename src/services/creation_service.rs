use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::database::models::{Creation, NewCreation};
use crate::database::{CreationStore, DatabaseError};
use crate::middleware::AuthContext;
use crate::providers::{
    BackgroundRemoval, Capability, CompletionRequest, DocumentExtractor, ImageGeneration,
    ImageSynthesis, MediaStore, ObjectRemoval, ObjectRemovalInput, ResumeReview, TextCompletion,
    TextGeneration, TokenBudget, UploadedFile,
};
use crate::services::entitlement::{Entitlement, EntitlementLedger};
use crate::services::error::CreationError;
use crate::types::Operation;

/// The capability adapters behind each operation
pub struct CreationAdapters {
    pub text: TextGeneration,
    pub image: ImageGeneration,
    pub background: BackgroundRemoval,
    pub object: ObjectRemoval,
    pub resume: ResumeReview,
}

impl CreationAdapters {
    pub fn from_clients(
        text: Arc<dyn TextCompletion>,
        images: Arc<dyn ImageSynthesis>,
        media: Arc<dyn MediaStore>,
        documents: Arc<dyn DocumentExtractor>,
    ) -> Self {
        Self {
            text: TextGeneration::new(text.clone()),
            image: ImageGeneration::new(images, media.clone()),
            background: BackgroundRemoval::new(media.clone()),
            object: ObjectRemoval::new(media),
            resume: ResumeReview::new(documents, text),
        }
    }
}

/// What gets written to the creation record besides the content
struct Draft {
    prompt: String,
    publish: bool,
}

impl Draft {
    fn private(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            publish: false,
        }
    }
}

/// Runs every creation request through check -> invoke -> record -> consume.
///
/// Quota is consumed only after the record is stored. A denied, invalid or
/// failed request leaves both the store and the counter untouched.
pub struct CreationService {
    ledger: EntitlementLedger,
    store: Arc<dyn CreationStore>,
    adapters: CreationAdapters,
}

impl CreationService {
    pub fn new(
        ledger: EntitlementLedger,
        store: Arc<dyn CreationStore>,
        adapters: CreationAdapters,
    ) -> Self {
        Self {
            ledger,
            store,
            adapters,
        }
    }

    pub async fn generate_article(
        &self,
        auth: &AuthContext,
        prompt: String,
        length: Option<&Value>,
    ) -> Result<String, CreationError> {
        let request = CompletionRequest {
            max_tokens: TokenBudget::for_article(length),
            prompt: prompt.clone(),
        };
        self.execute(
            auth,
            Operation::GenerateArticle,
            &self.adapters.text,
            request,
            Draft::private(prompt),
        )
        .await
    }

    pub async fn generate_blog_title(
        &self,
        auth: &AuthContext,
        prompt: String,
    ) -> Result<String, CreationError> {
        let request = CompletionRequest {
            max_tokens: TokenBudget::DEFAULT,
            prompt: prompt.clone(),
        };
        self.execute(
            auth,
            Operation::GenerateBlogTitle,
            &self.adapters.text,
            request,
            Draft::private(prompt),
        )
        .await
    }

    pub async fn generate_image(
        &self,
        auth: &AuthContext,
        prompt: String,
        publish: bool,
    ) -> Result<String, CreationError> {
        let draft = Draft {
            prompt: prompt.clone(),
            publish,
        };
        self.execute(auth, Operation::GenerateImage, &self.adapters.image, prompt, draft)
            .await
    }

    pub async fn remove_background(
        &self,
        auth: &AuthContext,
        image: Option<UploadedFile>,
    ) -> Result<String, CreationError> {
        self.execute(
            auth,
            Operation::RemoveBackground,
            &self.adapters.background,
            image,
            Draft::private("Remove background from image"),
        )
        .await
    }

    pub async fn remove_object(
        &self,
        auth: &AuthContext,
        image: Option<UploadedFile>,
        object: Option<String>,
    ) -> Result<String, CreationError> {
        let label = object.as_deref().map(str::trim).unwrap_or_default();
        let draft = Draft::private(format!("Removed {} from image", label));
        self.execute(
            auth,
            Operation::RemoveObject,
            &self.adapters.object,
            ObjectRemovalInput { image, object },
            draft,
        )
        .await
    }

    pub async fn review_resume(
        &self,
        auth: &AuthContext,
        resume: Option<UploadedFile>,
    ) -> Result<String, CreationError> {
        self.execute(
            auth,
            Operation::ReviewResume,
            &self.adapters.resume,
            resume,
            Draft::private("Review the uploaded resume"),
        )
        .await
    }

    /// The caller's creations, newest first
    pub async fn user_creations(&self, auth: &AuthContext) -> Result<Vec<Creation>, DatabaseError> {
        self.store.list_for_user(&auth.user_id).await
    }

    /// Published creations of every user, newest first
    pub async fn published_creations(&self) -> Result<Vec<Creation>, DatabaseError> {
        self.store.list_published().await
    }

    async fn execute<C>(
        &self,
        auth: &AuthContext,
        operation: Operation,
        adapter: &C,
        input: C::Input,
        draft: Draft,
    ) -> Result<String, CreationError>
    where
        C: Capability<Output = String>,
    {
        let grant = match self.ledger.check(auth, operation) {
            Entitlement::Allowed(grant) => grant,
            Entitlement::Denied(denial) => {
                info!(user_id = %auth.user_id, %operation, ?denial, "request denied");
                return Err(denial.into());
            }
        };

        let content = adapter.invoke(input).await.map_err(|err| {
            warn!(user_id = %auth.user_id, %operation, error = %err, "operation failed");
            CreationError::from(err)
        })?;

        let record = NewCreation {
            user_id: auth.user_id.clone(),
            prompt: draft.prompt,
            content: content.clone(),
            kind: operation.creation_kind(),
            publish: draft.publish,
        };

        if let Err(err) = self.store.record(record).await {
            error!(
                user_id = %auth.user_id,
                %operation,
                content = %content,
                error = %err,
                "creation produced but not recorded"
            );
            return Err(CreationError::Persistence);
        }

        if let Err(err) = self.ledger.consume(grant).await {
            error!(
                user_id = %auth.user_id,
                %operation,
                error = %err,
                "creation recorded but free usage not incremented"
            );
        }

        info!(
            user_id = %auth.user_id,
            %operation,
            kind = %operation.creation_kind(),
            "creation completed"
        );
        Ok(content)
    }
}
