//! Signed uploads to the media host (Cloudinary).
//!
//! Every upload is signed: the non-file parameters are sorted by name, joined
//! as `k=v&k=v`, suffixed with the API secret and hashed with SHA-256. The
//! account must have SHA-256 signatures enabled.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::instrument;

use crate::config::MediaConfig;

/// Timeout for one upload request.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors from the media host.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The host rejected the upload.
    #[error("media host returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The upload URL could not be built.
    #[error("invalid upload URL: {0}")]
    Url(#[from] url::ParseError),
}

/// What the host stores a file as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
    Video,
}

impl ResourceType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// A file to upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub resource_type: ResourceType,
    pub folder: &'static str,
    /// Explicit public id; the host picks one when `None`.
    pub public_id: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The stored file.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedMedia {
    pub secure_url: String,
    #[serde(default)]
    pub public_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HostError {
    error: HostErrorMessage,
}

#[derive(Debug, Deserialize)]
struct HostErrorMessage {
    message: String,
}

/// Client for the media host upload API.
#[derive(Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    config: MediaConfig,
}

impl std::fmt::Debug for MediaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MediaClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Http` if the HTTP client cannot be built.
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    /// Upload a file and return where it is served from.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Rejected` when the host answers with an error
    /// status, `MediaError::Http` on transport failure.
    #[instrument(skip(self, upload), fields(folder = upload.folder, size = upload.bytes.len()))]
    pub async fn upload(&self, upload: Upload) -> Result<UploadedMedia, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut params: Vec<(&'static str, String)> = vec![
            ("folder", upload.folder.to_owned()),
            ("timestamp", timestamp),
        ];
        if let Some(public_id) = &upload.public_id {
            params.push(("public_id", public_id.clone()));
        }
        let signature = sign(&params, self.config.api_secret.expose_secret());

        let file = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let url = self.upload_url(upload.resource_type)?;
        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<HostError>(&body)
                .map_or(body, |e| e.error.message);
            tracing::warn!(status = status.as_u16(), %message, "Media host rejected upload");
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let media: UploadedMedia = response.json().await?;
        tracing::info!(url = %media.secure_url, "Uploaded media");
        Ok(media)
    }

    fn upload_url(&self, resource_type: ResourceType) -> Result<url::Url, url::ParseError> {
        let base = self.config.api_url.as_str().trim_end_matches('/');
        url::Url::parse(&format!(
            "{base}/{}/{}/upload",
            self.config.cloud_name,
            resource_type.as_str()
        ))
    }
}

/// Signature over `params`: sorted `k=v` pairs joined by `&`, then the secret.
fn sign(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{to_sign}{secret}").as_bytes()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(api_url: &str) -> MediaClient {
        MediaClient::new(MediaConfig {
            api_url: Url::parse(api_url).unwrap(),
            cloud_name: "favobliss".to_owned(),
            api_key: "000000000000000".to_owned(),
            api_secret: SecretString::from("abcd"),
        })
        .unwrap()
    }

    fn image() -> Upload {
        Upload {
            resource_type: ResourceType::Image,
            folder: "product-images",
            public_id: Some("1760000000000-shirt".to_owned()),
            file_name: "shirt.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn test_sign_sorts_params() {
        let a = sign(
            &[("timestamp", "1".to_owned()), ("folder", "f".to_owned())],
            "abcd",
        );
        let b = sign(
            &[("folder", "f".to_owned()), ("timestamp", "1".to_owned())],
            "abcd",
        );
        assert_eq!(a, b);
        assert_eq!(
            a,
            hex::encode(Sha256::digest(b"folder=f&timestamp=1abcd"))
        );
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_upload_url() {
        let c = client("https://api.cloudinary.com/v1_1/");
        assert_eq!(
            c.upload_url(ResourceType::Video).unwrap().as_str(),
            "https://api.cloudinary.com/v1_1/favobliss/video/upload"
        );
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/favobliss/image/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "secure_url": "https://res.cloudinary.com/favobliss/image/upload/product-images/shirt.png",
                "public_id": "product-images/1760000000000-shirt"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let media = client(&server.uri()).upload(image()).await.unwrap();
        assert!(media.secure_url.ends_with("shirt.png"));
    }

    #[tokio::test]
    async fn test_upload_surfaces_host_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Invalid Signature"}
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri()).upload(image()).await.unwrap_err();
        match err {
            MediaError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
