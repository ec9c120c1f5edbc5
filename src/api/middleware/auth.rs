//! JWT authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AppError;
use crate::models::UserRole;
use crate::utils::jwt::{Claims, validate_access_token};

/// The caller of an authenticated request.
///
/// Inserted into the request extensions by [`auth_middleware`]; handlers
/// take it directly as an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized {
                message: "Authentication required".to_string(),
            })
    }
}

/// Requires `Authorization: Bearer <access token>`.
///
/// Missing, malformed, expired and refresh tokens are all rejected with 401.
///
/// ```ignore
/// router.layer(middleware::from_fn_with_state(settings.jwt.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(jwt): State<JwtConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })?;

    let claims = validate_access_token(token, &jwt.secret)?;
    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::{TokenType, generate_token};
    use axum::{Router, body::Body, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_at_least_32_characters_long".to_string(),
            access_token_expiration: 1,
            refresh_token_expiration: 168,
        }
    }

    fn token(token_type: TokenType) -> String {
        generate_token(
            Uuid::nil(),
            "admin@example.com",
            UserRole::Admin,
            token_type,
            &jwt_config().secret,
            1,
        )
        .unwrap()
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|user: AuthUser| async move { format!("{}:{}", user.email, user.role) }),
            )
            .layer(middleware::from_fn_with_state(jwt_config(), auth_middleware))
    }

    async fn call(authorization: Option<String>) -> Response {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_access_token() {
        let response = call(Some(format!("Bearer {}", token(TokenType::Access)))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejections() {
        assert_eq!(call(None).await.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            call(Some(token(TokenType::Access))).await.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            call(Some(format!("Bearer {}", token(TokenType::Refresh))))
                .await
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            call(Some("Bearer not.a.jwt".to_string())).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_extractor_without_middleware() {
        let app = Router::new().route("/", get(|_: AuthUser| async { "unreachable" }));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
