/// Featured-image upload proxy
///
/// Accepts a multipart form, validates the bytes locally, and forwards
/// them to the external media host. Nothing is written to local disk.
use actix_multipart::Multipart;
use actix_web::HttpResponse;
use actix_web::web;
use futures::StreamExt;

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::UploadResponse;
use crate::services::media::{self, MAX_IMAGE_BYTES};
use crate::services::MediaHostClient;

/// Upload a featured image to the media host
#[utoipa::path(
    post,
    path = "/api/v1/uploads/image",
    tag = "Uploads",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Image hosted", body = UploadResponse),
        (status = 400, description = "No image field, unsupported format, or file too large"),
        (status = 401, description = "Not authenticated"),
        (status = 502, description = "Media host rejected the upload")
    )
)]
pub async fn upload_image(
    user: AuthenticatedUser,
    media_host: web::Data<MediaHostClient>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;

        if field.name() != Some("image") {
            // Drain unrelated fields so the client is not left blocked
            while field.next().await.is_some() {}
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Error reading upload: {e}")))?;
            if bytes.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(AppError::ValidationError(format!(
                    "Image exceeds the {}KB limit",
                    MAX_IMAGE_BYTES / 1024
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        image = Some((bytes, file_name));
        break;
    }

    let (bytes, file_name) =
        image.ok_or_else(|| AppError::ValidationError("No image file provided".to_string()))?;

    let format = media::validate_image_bytes(&bytes)?;
    let hosted = media_host.upload(bytes, &file_name).await?;

    tracing::info!(
        user_id = %user.id,
        public_id = %hosted.public_id,
        format = ?format,
        "Featured image uploaded"
    );

    Ok(HttpResponse::Ok().json(hosted))
}
