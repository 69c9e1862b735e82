/// External media host client and upload validation
///
/// Featured images are never stored locally: validated bytes are
/// forwarded to the media host and only its public URL and identifier are
/// kept. Deleting a post cascades to `destroy` for its hosted image.
use std::time::Duration;

use image::ImageFormat;
use reqwest::multipart;
use reqwest::Client;
use serde::Deserialize;

use crate::config::MediaConfig;
use crate::error::{AppError, Result};
use crate::models::UploadResponse;

/// Featured images are small; anything bigger is rejected before any
/// upstream traffic happens.
pub const MAX_IMAGE_BYTES: usize = 150 * 1024;

#[derive(Debug, Deserialize)]
struct HostedImage {
    secure_url: String,
    public_id: String,
}

/// Reject bytes that are not an allowed image format
///
/// The format is sniffed from the bytes themselves; the client-supplied
/// filename and content type are not trusted.
pub fn validate_image_bytes(bytes: &[u8]) -> Result<ImageFormat> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::BadRequest(format!(
            "Image exceeds the {} KB limit",
            MAX_IMAGE_BYTES / 1024
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| AppError::BadRequest("Unrecognized image data".to_string()))?;

    match format {
        ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP | ImageFormat::Gif => Ok(format),
        other => Err(AppError::BadRequest(format!(
            "Image type not allowed: {:?}",
            other
        ))),
    }
}

#[derive(Clone)]
pub struct MediaHostClient {
    http: Client,
    upload_url: String,
    delete_url: String,
    api_key: Option<String>,
    folder: String,
}

impl MediaHostClient {
    pub fn new(config: &MediaConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            upload_url: config.upload_url.clone(),
            delete_url: config.delete_url.clone(),
            api_key: config.api_key.clone(),
            folder: config.folder.clone(),
        })
    }

    /// Forward validated image bytes to the media host
    pub async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<UploadResponse> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("folder", self.folder.clone())
            .text("resource_type", "image");

        let mut request = self.http.post(&self.upload_url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Media host unreachable during upload");
            AppError::Upstream(format!("Media host unreachable: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(%status, "Media host rejected upload");
            return Err(AppError::Upstream(format!(
                "Media host rejected upload with status {status}"
            )));
        }

        let hosted = response.json::<HostedImage>().await.map_err(|e| {
            AppError::Upstream(format!("Invalid media host response: {e}"))
        })?;

        Ok(UploadResponse {
            url: hosted.secure_url,
            public_id: hosted.public_id,
        })
    }

    /// Delete a hosted image by its public identifier
    pub async fn destroy(&self, public_id: &str) -> Result<()> {
        let mut request = self
            .http
            .post(&self.delete_url)
            .json(&serde_json::json!({ "public_id": public_id }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, public_id, "Media host unreachable during destroy");
            AppError::Upstream(format!("Media host unreachable: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Upstream(format!(
                "Media host rejected image deletion with status {status}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid headers for format sniffing
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];
    const GIF_MAGIC: &[u8] = b"GIF89a";
    const BMP_MAGIC: &[u8] = &[0x42, 0x4D, 0x1E, 0x00];

    #[test]
    fn test_allowed_formats_pass() {
        assert_eq!(validate_image_bytes(PNG_MAGIC).unwrap(), ImageFormat::Png);
        assert_eq!(validate_image_bytes(JPEG_MAGIC).unwrap(), ImageFormat::Jpeg);
        assert_eq!(validate_image_bytes(GIF_MAGIC).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_disallowed_format_rejected() {
        let err = validate_image_bytes(BMP_MAGIC).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(validate_image_bytes(b"definitely not an image").is_err());
    }

    #[test]
    fn test_oversized_image_rejected() {
        let mut bytes = Vec::with_capacity(MAX_IMAGE_BYTES + 1);
        bytes.extend_from_slice(PNG_MAGIC);
        bytes.resize(MAX_IMAGE_BYTES + 1, 0);

        let err = validate_image_bytes(&bytes).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
