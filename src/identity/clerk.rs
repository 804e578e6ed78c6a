use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{free_usage_from_metadata, IdentityError, IdentityProvider, FREE_USAGE_KEY};

/// Clerk Backend API client reading and writing private user metadata
#[derive(Clone)]
pub struct ClerkIdentityProvider {
    http: Client,
    base_url: String,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
struct ClerkUser {
    #[serde(default)]
    private_metadata: Value,
}

impl ClerkIdentityProvider {
    pub fn new(
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            secret_key: secret_key.into(),
        })
    }

    fn user_url(&self, user_id: &str, suffix: &str) -> String {
        format!(
            "{}/v1/users/{}{}",
            self.base_url.trim_end_matches('/'),
            user_id,
            suffix
        )
    }

    fn ensure_configured(&self) -> Result<(), IdentityError> {
        if self.secret_key.trim().is_empty() {
            return Err(IdentityError::NotConfigured("CLERK_SECRET_KEY"));
        }
        Ok(())
    }

    async fn check_status(
        user_id: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, IdentityError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(IdentityError::UnknownUser(user_id.to_string()));
        }
        let body = response.text().await.unwrap_or_default();
        Err(IdentityError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl IdentityProvider for ClerkIdentityProvider {
    async fn free_usage(&self, user_id: &str) -> Result<u32, IdentityError> {
        self.ensure_configured()?;

        let response = self
            .http
            .get(self.user_url(user_id, ""))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let user: ClerkUser = Self::check_status(user_id, response)
            .await?
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        Ok(free_usage_from_metadata(&user.private_metadata))
    }

    async fn set_free_usage(&self, user_id: &str, count: u32) -> Result<(), IdentityError> {
        self.ensure_configured()?;

        let response = self
            .http
            .patch(self.user_url(user_id, "/metadata"))
            .bearer_auth(&self.secret_key)
            .json(&json!({ "private_metadata": { FREE_USAGE_KEY: count } }))
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        Self::check_status(user_id, response).await?;
        Ok(())
    }
}
