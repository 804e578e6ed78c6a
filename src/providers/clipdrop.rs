use async_trait::async_trait;
use reqwest::{multipart, Client};
use std::time::Duration;

use super::{ImageSynthesis, ProviderError};

const PROVIDER: &str = "image synthesis";

/// ClipDrop text-to-image client
#[derive(Clone)]
pub struct ClipdropClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl ClipdropClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl ImageSynthesis for ClipdropClient {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured {
                provider: PROVIDER,
                setting: "CLIPDROP_API_KEY",
            });
        }

        let form = multipart::Form::new().text("prompt", prompt.to_string());

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        let bytes = ProviderError::check_status(PROVIDER, response)
            .await?
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        if bytes.is_empty() {
            return Err(ProviderError::invalid(PROVIDER, "empty image body"));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    #[tokio::test]
    async fn posts_prompt_form_and_returns_bytes() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/text-to-image/v1")
                    .header("x-api-key", "clip-key")
                    .body_includes("name=\"prompt\"")
                    .body_includes("a red fox");
                then.status(200)
                    .header("content-type", "image/png")
                    .body([0x89u8, b'P', b'N', b'G']);
            })
            .await;

        let client = ClipdropClient::new(server.url("/text-to-image/v1"), "clip-key", Duration::from_secs(5)).unwrap();
        let bytes = client.synthesize("a red fox").await.unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = ClipdropClient::new("http://127.0.0.1:9", "", Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.synthesize("x").await,
            Err(ProviderError::NotConfigured { .. })
        ));
    }
}
