//! Error handling at the HTTP boundary.
//!
//! `AppError` renders itself as an [`ErrorResponse`]. The
//! [`global_error_handler`] middleware rewrites every other error response
//! (axum rejections, 404 fallbacks, timeouts) into the same envelope and
//! stamps the request id on all of them.

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Error bodies larger than this are not inspected.
const MAX_ERROR_BODY: usize = 64 * 1024;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Duplicate { .. } => StatusCode::CONFLICT,
            AppError::Validation { .. }
            | AppError::ValidationErrors { .. }
            | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::UnprocessableContent { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database { .. }
            | AppError::Storage { .. }
            | AppError::Configuration { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
            AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::UnprocessableContent { .. } => "UNPROCESSABLE_CONTENT",
            AppError::Unauthorized { .. } => "UNAUTHORIZED",
            AppError::Forbidden { .. } => "FORBIDDEN",
            AppError::Database { .. } => "DATABASE_ERROR",
            AppError::Storage { .. } => "STORAGE_ERROR",
            AppError::Configuration { .. } => "CONFIGURATION_ERROR",
            AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// The client-facing body. Server-side sources are never exposed.
    pub fn to_error_response(&self) -> ErrorResponse {
        match self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::Validation { field, reason } => {
                ErrorResponse::validation_error(field, reason)
            }
            AppError::ValidationErrors { errors } => ErrorResponse::validation_errors(errors),
            AppError::BadRequest { message }
            | AppError::UnprocessableContent { message }
            | AppError::Unauthorized { message }
            | AppError::Forbidden { message } => ErrorResponse::new(self.code(), message),
            AppError::Database { operation, .. } => ErrorResponse::new(
                self.code(),
                &format!("Database operation failed: {}", operation),
            )
            .with_details(json!({ "operation": operation })),
            AppError::Storage { operation, .. } => ErrorResponse::new(
                self.code(),
                &format!("Storage operation failed: {}", operation),
            )
            .with_details(json!({ "operation": operation })),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new(self.code(), &format!("Configuration error: {}", key))
                    .with_details(json!({ "key": key }))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new(self.code(), "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new(self.code(), "An internal error occurred")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }
        (status, Json(self.to_error_response())).into_response()
    }
}

/// Normalizes every error response into an [`ErrorResponse`] carrying the
/// request id.
///
/// JSON error bodies are assumed to already be `ErrorResponse`s and only get
/// the id added. Plain-text bodies (axum rejections, fallbacks, the timeout
/// layer) become the message of a new envelope.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => Default::default(),
    };

    let mut error = if is_json {
        match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(error) => error,
            Err(_) => return Response::from_parts(parts, Body::from(bytes)),
        }
    } else {
        let message = String::from_utf8_lossy(&bytes).trim().to_string();
        fallback_error(status, message)
    };

    if let Some(RequestId(id)) = &request_id {
        error = error.with_request_id(id);
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    (parts, Json(error)).into_response()
}

fn fallback_error(status: StatusCode, message: String) -> ErrorResponse {
    let (code, default_message) = match status {
        StatusCode::BAD_REQUEST => ("BAD_REQUEST", "Bad request"),
        StatusCode::UNAUTHORIZED => ("UNAUTHORIZED", "Authentication required"),
        StatusCode::FORBIDDEN => ("FORBIDDEN", "Access denied"),
        StatusCode::NOT_FOUND => ("NOT_FOUND", "The requested resource was not found"),
        StatusCode::METHOD_NOT_ALLOWED => {
            ("METHOD_NOT_ALLOWED", "HTTP method not allowed for this endpoint")
        }
        StatusCode::REQUEST_TIMEOUT => ("REQUEST_TIMEOUT", "Request timeout"),
        StatusCode::PAYLOAD_TOO_LARGE => ("PAYLOAD_TOO_LARGE", "Request payload too large"),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ("UNSUPPORTED_MEDIA_TYPE", "Unsupported media type"),
        StatusCode::UNPROCESSABLE_ENTITY => ("UNPROCESSABLE_CONTENT", "Unprocessable content"),
        StatusCode::SERVICE_UNAVAILABLE => {
            ("SERVICE_UNAVAILABLE", "Service temporarily unavailable")
        }
        s if s.is_server_error() => ("INTERNAL_ERROR", "An internal error occurred"),
        _ => ("UNKNOWN_ERROR", "An unknown error occurred"),
    };

    // Server error bodies may carry internals.
    let message = if message.is_empty() || status.is_server_error() {
        default_message.to_string()
    } else {
        message
    };
    ErrorResponse::new(code, &message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::request_id_middleware;
    use crate::error::ValidationFieldError;
    use axum::{Router, middleware, routing::get};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_and_code_mapping() {
        let cases = [
            (AppError::not_found("company", "id", 1), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                AppError::Duplicate {
                    entity: "user".into(),
                    field: "email".into(),
                    value: "a@b.c".into(),
                },
                StatusCode::CONFLICT,
                "DUPLICATE_ENTRY",
            ),
            (
                AppError::ValidationErrors { errors: vec![] },
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::UnprocessableContent { message: "dup".into() },
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_CONTENT",
            ),
            (
                AppError::Storage {
                    operation: "upload image".into(),
                    source: anyhow::anyhow!("bucket gone"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
            ),
            (
                AppError::ConnectionPool { source: anyhow::anyhow!("exhausted") },
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
            (
                AppError::Internal { source: anyhow::anyhow!("boom") },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_code(), status);
            assert_eq!(error.code(), code);
        }
    }

    #[tokio::test]
    async fn test_internal_source_is_not_exposed() {
        let error = AppError::Database {
            operation: "insert company".into(),
            source: anyhow::anyhow!("password=hunter2"),
        };
        let body = body_json(error.into_response()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert!(!body.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn test_validation_errors_listed_in_details() {
        let error = AppError::ValidationErrors {
            errors: vec![ValidationFieldError {
                field: "email".into(),
                message: "Invalid email format".into(),
            }],
        };
        let body = body_json(error.into_response()).await;
        assert_eq!(body["details"]["errors"][0]["field"], "email");
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/missing",
                get(|| async { AppError::not_found("job_post", "id", "x") }),
            )
            .route(
                "/plain",
                get(|| async { (StatusCode::BAD_REQUEST, "Failed to parse the request body") }),
            )
            .route("/ok", get(|| async { "fine" }))
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(request_id_middleware))
    }

    fn request(uri: &str) -> Request {
        Request::builder()
            .uri(uri)
            .header("x-request-id", "req-7")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_app_error_gets_request_id() {
        let response = app().oneshot(request("/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["request_id"], "req-7");
    }

    #[tokio::test]
    async fn test_plain_text_error_is_wrapped() {
        let response = app().oneshot(request("/plain")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "Failed to parse the request body");
        assert_eq!(body["request_id"], "req-7");
    }

    #[tokio::test]
    async fn test_unknown_route_is_wrapped() {
        let response = app().oneshot(request("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let response = app().oneshot(request("/ok")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"fine");
    }
}
