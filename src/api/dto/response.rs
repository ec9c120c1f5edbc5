//! Success envelope shared by every endpoint.

use serde::Serialize;
use utoipa::ToSchema;

/// `{ "success": true, "message": ..., "data": ... }`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = "Company retrieved successfully")]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Payload of responses that only carry a message; serialized as `null`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoData {}

impl ApiResponse<NoData> {
    /// Envelope with `data: null`, for deletes and acknowledgements.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}
