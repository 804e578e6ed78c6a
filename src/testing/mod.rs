//! In-memory fakes for the identity provider, the creation store and every
//! outbound provider. Each fake records its calls so tests can assert on side
//! effects.

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::database::models::{Creation, NewCreation};
use crate::database::{CreationStore, DatabaseError};
use crate::identity::{IdentityError, IdentityProvider};
use crate::providers::{
    CompletionRequest, DocumentExtractor, ImageSynthesis, MediaStore, ProviderError, StoredMedia,
    TextCompletion, Transformation,
};

fn outage(provider: &'static str) -> ProviderError {
    ProviderError::Status {
        provider,
        status: 503,
        body: "unavailable".to_string(),
    }
}

/// Text completion returning a fixed reply, or failing when built with `failing`
#[derive(Default)]
pub struct StubText {
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubText {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextCompletion for StubText {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone().ok_or_else(|| outage("text completion"))
    }
}

/// Image synthesis returning fixed bytes
#[derive(Default)]
pub struct StubImages {
    bytes: Option<Vec<u8>>,
    calls: AtomicUsize,
}

impl StubImages {
    pub fn returning(bytes: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            bytes: Some(bytes.to_vec()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSynthesis for StubImages {
    async fn synthesize(&self, _prompt: &str) -> Result<Vec<u8>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bytes.clone().ok_or_else(|| outage("image synthesis"))
    }
}

/// Media store keeping every upload in memory
#[derive(Default)]
pub struct RecordingMediaStore {
    fail: bool,
    uploads: Mutex<Vec<(Bytes, Option<Transformation>)>>,
}

impl RecordingMediaStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            uploads: Mutex::new(Vec::new()),
        })
    }

    pub fn uploads(&self) -> Vec<(Bytes, Option<Transformation>)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(
        &self,
        image: Bytes,
        transformation: Option<Transformation>,
    ) -> Result<StoredMedia, ProviderError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((image, transformation));
        if self.fail {
            return Err(outage("media storage"));
        }
        let public_id = format!("media-{}", uploads.len());
        Ok(StoredMedia {
            secure_url: format!("https://media.test/{}.png", public_id),
            public_id,
        })
    }

    fn transformed_url(&self, public_id: &str, transformation: &Transformation) -> String {
        match transformation {
            Transformation::RemoveBackground => format!("https://media.test/bg/{}", public_id),
            Transformation::RemoveObject(object) => {
                format!("https://media.test/remove:{}/{}", object, public_id)
            }
        }
    }
}

/// Document extractor returning fixed text
pub struct StubExtractor {
    text: String,
    calls: AtomicUsize,
}

impl StubExtractor {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentExtractor for StubExtractor {
    async fn extract_text(&self, _document: Bytes) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// Identity provider holding free-usage counters in memory
#[derive(Default)]
pub struct InMemoryIdentity {
    counters: Mutex<HashMap<String, u32>>,
    writes: Mutex<Vec<(String, u32)>>,
    fail_writes: bool,
}

impl InMemoryIdentity {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_user(user_id: &str, free_usage: u32) -> Arc<Self> {
        let identity = Self::default();
        identity.counters.lock().unwrap().insert(user_id.to_string(), free_usage);
        Arc::new(identity)
    }

    pub fn rejecting_writes(user_id: &str, free_usage: u32) -> Arc<Self> {
        let identity = Self {
            fail_writes: true,
            ..Self::default()
        };
        identity.counters.lock().unwrap().insert(user_id.to_string(), free_usage);
        Arc::new(identity)
    }

    pub fn counter(&self, user_id: &str) -> Option<u32> {
        self.counters.lock().unwrap().get(user_id).copied()
    }

    pub fn writes(&self) -> Vec<(String, u32)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentity {
    async fn free_usage(&self, user_id: &str) -> Result<u32, IdentityError> {
        self.counters
            .lock()
            .unwrap()
            .get(user_id)
            .copied()
            .ok_or_else(|| IdentityError::UnknownUser(user_id.to_string()))
    }

    async fn set_free_usage(&self, user_id: &str, count: u32) -> Result<(), IdentityError> {
        if self.fail_writes {
            return Err(IdentityError::Transport("metadata update refused".to_string()));
        }
        self.writes.lock().unwrap().push((user_id.to_string(), count));
        self.counters.lock().unwrap().insert(user_id.to_string(), count);
        Ok(())
    }
}

/// Creation store appending to a vector
#[derive(Default)]
pub struct InMemoryCreationStore {
    fail: bool,
    records: Mutex<Vec<NewCreation>>,
}

impl InMemoryCreationStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            records: Mutex::new(Vec::new()),
        })
    }

    pub fn records(&self) -> Vec<NewCreation> {
        self.records.lock().unwrap().clone()
    }

    fn materialize(creation: &NewCreation) -> Creation {
        Creation {
            id: Uuid::new_v4(),
            user_id: creation.user_id.clone(),
            prompt: creation.prompt.clone(),
            content: creation.content.clone(),
            kind: creation.kind,
            publish: creation.publish,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl CreationStore for InMemoryCreationStore {
    async fn record(&self, creation: NewCreation) -> Result<(), DatabaseError> {
        if self.fail {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        self.records.lock().unwrap().push(creation);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Creation>, DatabaseError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .map(Self::materialize)
            .collect())
    }

    async fn list_published(&self) -> Result<Vec<Creation>, DatabaseError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|c| c.publish)
            .map(Self::materialize)
            .collect())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.fail {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}
