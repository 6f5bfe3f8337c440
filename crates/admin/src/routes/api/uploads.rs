//! Upload proxies to the media host.
//!
//! Image uploads answer with JSON messages; video uploads with plain text.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::media::{MediaError, ResourceType, Upload};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Request body cap for image uploads (the file limit plus multipart overhead).
pub const IMAGE_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// Request body cap for video uploads.
pub const VIDEO_BODY_LIMIT: usize = 100 * 1024 * 1024;

/// Largest accepted image file.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

const IMAGE_FOLDER: &str = "product-images";
const VIDEO_FOLDER: &str = "product_videos";

const TOO_LARGE: &str = "File size exceeds 5MB limit.";

/// Response for a stored file.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// A file read from a multipart body.
struct ReceivedFile {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Why the image handler refused a request.
#[derive(Debug, PartialEq, Eq)]
pub enum ImageRejection {
    Missing,
    InvalidType,
    TooLarge,
    Failed(String),
}

impl IntoResponse for ImageRejection {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Missing => (StatusCode::BAD_REQUEST, json!({"message": "No file uploaded"})),
            Self::InvalidType => (
                StatusCode::BAD_REQUEST,
                json!({"message": "Invalid file type. Only JPEG, PNG, GIF, and WebP are allowed."}),
            ),
            Self::TooLarge => (StatusCode::BAD_REQUEST, json!({"message": TOO_LARGE})),
            Self::Failed(error) => {
                let event_id = sentry::capture_message(&error, sentry::Level::Error);
                tracing::error!(%error, sentry_event_id = %event_id, "Image upload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"message": "Internal server error", "error": error}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Read the first field named `name`, skipping any others.
async fn read_field(
    multipart: &mut Multipart,
    name: &str,
) -> std::result::Result<Option<ReceivedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(name) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field.bytes().await?.to_vec();
        return Ok(Some(ReceivedFile {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// Check an image against the type and size rules.
fn check_image(file: &ReceivedFile) -> std::result::Result<(), ImageRejection> {
    if !ALLOWED_IMAGE_TYPES.contains(&file.content_type.as_str()) {
        return Err(ImageRejection::InvalidType);
    }
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ImageRejection::TooLarge);
    }
    Ok(())
}

/// Text for the `error` field of a failed upload: the host's own message when
/// it answered, the transport error otherwise.
fn failure_message(err: MediaError) -> String {
    match err {
        MediaError::Rejected { message, .. } => message,
        other => other.to_string(),
    }
}

/// `{millis}-{stem}` for a file name.
fn image_public_id(file_name: &str, millis: i64) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem)
        .trim();
    let stem = if stem.is_empty() { "image" } else { stem };
    format!("{millis}-{stem}")
}

/// `POST /api/upload-image`
#[instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    mut multipart: Multipart,
) -> std::result::Result<Json<UploadResponse>, ImageRejection> {
    let file = match read_field(&mut multipart, "image").await {
        Ok(Some(file)) => file,
        Ok(None) => return Err(ImageRejection::Missing),
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ImageRejection::TooLarge);
        }
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable image upload");
            return Err(ImageRejection::Missing);
        }
    };
    check_image(&file)?;

    let upload = Upload {
        resource_type: ResourceType::Image,
        folder: IMAGE_FOLDER,
        public_id: Some(image_public_id(
            &file.file_name,
            chrono::Utc::now().timestamp_millis(),
        )),
        file_name: file.file_name,
        content_type: file.content_type,
        bytes: file.bytes,
    };

    let media = state
        .media()
        .upload(upload)
        .await
        .map_err(|e| ImageRejection::Failed(failure_message(e)))?;

    Ok(Json(UploadResponse {
        url: media.secure_url,
    }))
}

/// `POST /api/upload-video`
#[instrument(skip_all)]
pub async fn upload_video(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let file = read_field(&mut multipart, "video")
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Unreadable video upload");
            AppError::BadRequest("No video file provided")
        })?
        .ok_or(AppError::BadRequest("No video file provided"))?;

    let upload = Upload {
        resource_type: ResourceType::Video,
        folder: VIDEO_FOLDER,
        public_id: None,
        file_name: file.file_name,
        content_type: file.content_type,
        bytes: file.bytes,
    };

    let media = state
        .media()
        .upload(upload)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(UploadResponse {
        url: media.secure_url,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn file(content_type: &str, len: usize) -> ReceivedFile {
        ReceivedFile {
            file_name: "shirt.png".to_owned(),
            content_type: content_type.to_owned(),
            bytes: vec![0; len],
        }
    }

    #[test]
    fn test_check_image() {
        assert_eq!(check_image(&file("image/png", 10)), Ok(()));
        assert_eq!(check_image(&file("image/webp", MAX_IMAGE_BYTES)), Ok(()));
        assert_eq!(
            check_image(&file("image/svg+xml", 10)),
            Err(ImageRejection::InvalidType)
        );
        assert_eq!(
            check_image(&file("image/jpeg", MAX_IMAGE_BYTES + 1)),
            Err(ImageRejection::TooLarge)
        );
    }

    #[test]
    fn test_failure_message_is_the_host_message() {
        let rejected = MediaError::Rejected {
            status: 401,
            message: "Invalid Signature".to_owned(),
        };
        assert_eq!(failure_message(rejected), "Invalid Signature");

        let bad_url = MediaError::Url(url::ParseError::EmptyHost);
        assert_eq!(failure_message(bad_url), "invalid upload URL: empty host");
    }

    #[tokio::test]
    async fn test_failed_upload_body_carries_host_message() {
        let response = ImageRejection::Failed(failure_message(MediaError::Rejected {
            status: 401,
            message: "Invalid Signature".to_owned(),
        }))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"message": "Internal server error", "error": "Invalid Signature"})
        );
    }

    #[test]
    fn test_image_public_id() {
        assert_eq!(image_public_id("shirt.png", 1_760_000_000_000), "1760000000000-shirt");
        assert_eq!(image_public_id("a.b.jpg", 5), "5-a.b");
        assert_eq!(image_public_id("noext", 5), "5-noext");
        assert_eq!(image_public_id(".png", 5), "5-image");
    }
}
