//! Signed uploads to Cloudinary's REST API

use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use super::{ImageHost, UploadError};

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Overridable so tests can point at a mock server.
    pub api_base: String,
}

impl CloudinaryConfig {
    #[must_use]
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }
}

/// Request signature: parameters sorted by name, joined as `k=v&k=v`, the
/// API secret appended, SHA-256 hex digest.
#[must_use]
pub fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl ImageHost for CloudinaryClient {
    async fn upload(&self, file: &Path, public_id: &str) -> Result<String, UploadError> {
        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[
                ("overwrite", "true"),
                ("public_id", public_id),
                ("timestamp", &timestamp),
            ],
            &self.config.api_secret,
        );

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("api_key", self.config.api_key.clone())
            .text("public_id", public_id.to_string())
            .text("overwrite", "true")
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        debug!(target: "catalog_scrape::upload", "Uploading {} as {public_id}", file.display());
        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Http(e.to_string()))?;
        parsed.secure_url.ok_or(UploadError::MissingUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha256_hex(input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }

    #[test]
    fn signature_sorts_parameters() {
        let signature = sign(
            &[("timestamp", "1315060510"), ("public_id", "sample_image")],
            "abcd",
        );
        assert_eq!(
            signature,
            sha256_hex("public_id=sample_image&timestamp=1315060510abcd")
        );
    }

    #[test]
    fn upload_url_ignores_trailing_slash() {
        let config = CloudinaryConfig::new("demo", "key", "secret").with_api_base("http://h/");
        assert_eq!(config.upload_url(), "http://h/v1_1/demo/image/upload");
    }

    #[tokio::test]
    async fn uploads_and_returns_secure_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1_1/demo/image/upload")
            .match_body(mockito::Matcher::Regex("Cat/Sub/prod_0001/prod_0001_img1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"secure_url": "https://res.example/demo/prod_0001_img1.jpg"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prod_0001_img1.jpg");
        std::fs::write(&file, b"jpeg bytes").unwrap();

        let client = CloudinaryClient::new(
            CloudinaryConfig::new("demo", "key", "secret").with_api_base(server.url()),
            Duration::from_secs(5),
        )
        .unwrap();

        let url = client
            .upload(&file, "Cat/Sub/prod_0001/prod_0001_img1")
            .await
            .unwrap();
        assert_eq!(url, "https://res.example/demo/prod_0001_img1.jpg");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejection_carries_the_api_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/image/upload")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Invalid Signature"}}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        std::fs::write(&file, b"x").unwrap();

        let client = CloudinaryClient::new(
            CloudinaryConfig::new("demo", "key", "wrong").with_api_base(server.url()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.upload(&file, "a").await,
            Err(UploadError::Rejected {
                status: 401,
                message: "Invalid Signature".into()
            })
        );
    }
}
