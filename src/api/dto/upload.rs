use utoipa::ToSchema;

/// `multipart/form-data` body of the image upload endpoints.
#[derive(ToSchema)]
pub struct ImageUploadForm {
    /// JPG, JPEG, PNG, GIF or WEBP, at most 5 MiB
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
