use async_trait::async_trait;
use axum::body::Bytes;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use url::Url;

use super::{MediaStore, ProviderError, StoredMedia, Transformation};

const PROVIDER: &str = "media storage";

/// Cloudinary account settings
#[derive(Debug, Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Cloudinary upload and delivery client
#[derive(Clone)]
pub struct CloudinaryClient {
    http: Client,
    api_base: String,
    delivery_base: Url,
    credentials: CloudinaryCredentials,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

impl CloudinaryClient {
    pub fn new(
        api_base: impl Into<String>,
        delivery_base: Url,
        credentials: CloudinaryCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: api_base.into(),
            delivery_base,
            credentials,
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.credentials.cloud_name
        )
    }

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        let missing = if self.credentials.cloud_name.trim().is_empty() {
            Some("CLOUDINARY_CLOUD_NAME")
        } else if self.credentials.api_key.trim().is_empty() {
            Some("CLOUDINARY_API_KEY")
        } else if self.credentials.api_secret.trim().is_empty() {
            Some("CLOUDINARY_API_SECRET")
        } else {
            None
        };

        match missing {
            Some(setting) => Err(ProviderError::NotConfigured {
                provider: PROVIDER,
                setting,
            }),
            None => Ok(()),
        }
    }
}

/// Transformation string in Cloudinary URL syntax
fn transformation_directive(transformation: &Transformation) -> String {
    match transformation {
        Transformation::RemoveBackground => "e_background_removal".to_string(),
        Transformation::RemoveObject(object) => format!("e_gen_remove:{}", object.trim()),
    }
}

/// SHA-256 request signature: parameters sorted by name, joined as
/// `k=v&k=v`, with the API secret appended.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{:x}", Sha256::digest(format!("{}{}", joined, api_secret).as_bytes()))
}

/// Guess an image MIME type from magic bytes, defaulting to PNG
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}

fn data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", sniff_mime(bytes), STANDARD.encode(bytes))
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(
        &self,
        image: Bytes,
        transformation: Option<Transformation>,
    ) -> Result<StoredMedia, ProviderError> {
        self.ensure_configured()?;

        let mut signed: Vec<(&'static str, String)> =
            vec![("timestamp", chrono::Utc::now().timestamp().to_string())];
        if let Some(t) = &transformation {
            signed.push(("transformation", transformation_directive(t)));
        }
        let signature = sign(&signed, &self.credentials.api_secret);

        let mut form = multipart::Form::new()
            .text("file", data_uri(&image))
            .text("api_key", self.credentials.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in signed {
            form = form.text(name, value);
        }

        let response = self
            .http
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, e))?;

        let uploaded: UploadResponse = ProviderError::check_status(PROVIDER, response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::invalid(PROVIDER, e.to_string()))?;

        Ok(StoredMedia {
            public_id: uploaded.public_id,
            secure_url: uploaded.secure_url,
        })
    }

    fn transformed_url(&self, public_id: &str, transformation: &Transformation) -> String {
        let mut url = self.delivery_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&self.credentials.cloud_name)
                .push("image")
                .push("upload")
                .push(&transformation_directive(transformation))
                .extend(public_id.split('/'));
        }
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn credentials() -> CloudinaryCredentials {
        CloudinaryCredentials {
            cloud_name: "demo".into(),
            api_key: "123".into(),
            api_secret: "shh".into(),
        }
    }

    fn client(api_base: String) -> CloudinaryClient {
        CloudinaryClient::new(
            api_base,
            Url::parse("https://res.cloudinary.com").unwrap(),
            credentials(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn signs_sorted_parameters() {
        let params = vec![
            ("transformation", "e_background_removal".to_string()),
            ("timestamp", "1700000000".to_string()),
        ];
        assert_eq!(
            sign(&params, "shh"),
            "a834cab3a331791969c22b3c58df2092b85eb7ed001cd3427cc7075d193c1f1b"
        );
        assert_eq!(
            sign(&[("timestamp", "1700000000".to_string())], "shh"),
            "289b5026acd442186d7bb7b7c0389c0929709fa8094d0592b5180610c56df137"
        );
    }

    #[test]
    fn builds_object_removal_delivery_urls() {
        let client = client("https://api.cloudinary.com/v1_1".into());
        let url = client.transformed_url("abc123", &Transformation::RemoveObject("red car".into()));
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/e_gen_remove:red%20car/abc123"
        );
    }

    #[test]
    fn sniffs_common_image_types() {
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a"), "image/gif");
        assert_eq!(sniff_mime(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(&[0x89, b'P', b'N', b'G']), "image/png");
        assert!(data_uri(&[1, 2, 3]).starts_with("data:image/png;base64,AQID"));
    }

    #[tokio::test]
    async fn uploads_with_transformation() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1_1/demo/image/upload")
                    .body_includes("e_background_removal")
                    .body_includes("name=\"signature\"");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(
                        json!({
                            "public_id": "abc123",
                            "secure_url": "https://res.cloudinary.com/demo/image/upload/abc123.png"
                        })
                        .to_string(),
                    );
            })
            .await;

        let stored = client(server.url("/v1_1"))
            .upload(Bytes::from_static(&[1, 2, 3]), Some(Transformation::RemoveBackground))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(stored.public_id, "abc123");
        assert!(stored.secure_url.ends_with("abc123.png"));
    }

    #[tokio::test]
    async fn missing_credentials_are_not_configured() {
        let mut creds = credentials();
        creds.api_secret.clear();
        let client = CloudinaryClient::new(
            "http://127.0.0.1:9",
            Url::parse("https://res.cloudinary.com").unwrap(),
            creds,
            Duration::from_secs(1),
        )
        .unwrap();

        assert!(matches!(
            client.upload(Bytes::from_static(&[1]), None).await,
            Err(ProviderError::NotConfigured { setting: "CLOUDINARY_API_SECRET", .. })
        ));
    }
}
