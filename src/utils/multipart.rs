use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};

use crate::error::{AppError, AppResult};
use crate::storage::ImageFile;

/// Name of the multipart part carrying the image.
pub const IMAGE_FIELD: &str = "file";

/// Extracts the `file` part of a `multipart/form-data` body as an image.
///
/// Other parts are skipped. Size and extension checks happen in storage.
#[derive(Debug, Clone)]
pub struct ImageUpload(pub ImageFile);

impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let mut multipart = Multipart::from_request(req, state).await?;

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(IMAGE_FIELD) {
                continue;
            }
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            return Ok(ImageUpload(ImageFile::new(file_name, bytes)));
        }

        Err(AppError::Validation {
            field: IMAGE_FIELD.to_string(),
            reason: format!("Multipart field '{}' is required", IMAGE_FIELD),
        })
    }
}

fn multipart_error(error: MultipartError) -> AppError {
    AppError::BadRequest {
        message: error.body_text(),
    }
}
