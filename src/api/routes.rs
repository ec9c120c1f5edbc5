//! Router assembly: OpenAPI-documented routes, Swagger UI, static uploads
//! and the middleware stack.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
};
use url::Url;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::config::{CorsConfig, Settings, StorageBackend};
use crate::state::AppState;

/// Builds the application router.
///
/// Public: `/health*`, `POST /api/auth/login`, `POST /api/auth/refresh`,
/// `POST /api/users`. Everything else under `/api` requires a bearer
/// access token.
///
/// Layers from outermost: request id, logging, CORS, compression, error
/// normalization, timeout, body limit. Error normalization sits inside
/// compression so that it always reads uncompressed bodies.
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let (api_router, openapi) = api_routes(&state).split_for_parts();

    let mut router = api_router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    if let Some((mount, root_dir)) = upload_mount(settings) {
        tracing::info!(mount = %mount, root_dir = %root_dir, "Serving uploaded images");
        router = router.nest_service(&mount, ServeDir::new(root_dir));
    }

    let body_limit = settings.server.body_limit;
    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            settings.server.request_timeout,
        )))
        .layer(middleware::from_fn(global_error_handler))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&settings.cors))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}

fn api_routes(state: &AppState) -> OpenApiRouter<AppState> {
    let protected = OpenApiRouter::new()
        .nest("/api/auth", handlers::auth::session_routes())
        .nest("/api/users", handlers::users::user_routes())
        .nest("/api/companies", handlers::companies::company_routes())
        .nest(
            "/api/job-categories",
            handlers::job_categories::job_category_routes(),
        )
        .nest("/api/job-posts", handlers::job_posts::job_post_routes())
        .route_layer(middleware::from_fn_with_state(
            state.jwt_config.clone(),
            auth_middleware,
        ));

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::health::health_routes())
        .nest("/api/auth", handlers::auth::auth_routes())
        .nest("/api/users", handlers::users::registration_routes())
        .merge(protected)
}

/// Empty `allowed_origins` allows any origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let list: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin.trim_end_matches('/')).ok())
            .collect();
        AllowOrigin::list(list)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age))
}

/// Path under which the local storage directory is served, taken from the
/// path of `storage.local.public_url`.
fn upload_mount(settings: &Settings) -> Option<(String, String)> {
    if settings.storage.backend != StorageBackend::Local {
        return None;
    }
    let local = &settings.storage.local;
    let url = Url::parse(&local.public_url).ok()?;
    let mount = url.path().trim_end_matches('/');
    if mount.is_empty() {
        tracing::warn!(
            public_url = %local.public_url,
            "Local storage public URL has no path, uploads are not served"
        );
        return None;
    }
    Some((mount.to_string(), local.root_dir.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use diesel_async::AsyncPgConnection;
    use diesel_async::pooled_connection::AsyncDieselConnectionManager;
    use diesel_async::pooled_connection::bb8::Pool;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::JwtConfig;
    use crate::models::UserRole;
    use crate::storage::DisabledImageStorage;
    use crate::utils::jwt::{TokenType, generate_token};

    const SECRET: &str = "router_test_secret_at_least_32_characters";

    /// Router over a pool that never connects. Requests here are rejected
    /// before any handler touches the database.
    fn app() -> Router {
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new("postgres://localhost/careers_test");
        let pool = Pool::builder().build_unchecked(manager);
        let jwt = JwtConfig {
            secret: SECRET.to_string(),
            ..JwtConfig::default()
        };
        let state = AppState::new(pool, jwt, Arc::new(DisabledImageStorage));
        create_router(state, &Settings::default())
    }

    fn bearer() -> String {
        let token = generate_token(
            Uuid::new_v4(),
            "recruiter@example.com",
            UserRole::Applicant,
            TokenType::Access,
            SECRET,
            1,
        )
        .unwrap();
        format!("Bearer {}", token)
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_token() {
        let request = Request::builder()
            .uri("/api/users")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/api/job-posts")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_registration_is_public_and_rejects_empty_body() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_page_is_rejected_before_querying() {
        for query in ["page=0", "per_page=0", "page=-3"] {
            let request = Request::builder()
                .uri(format!("/api/job-posts?{}", query))
                .header(header::AUTHORIZATION, bearer())
                .body(Body::empty())
                .unwrap();
            assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST, "{}", query);
        }
    }

    #[tokio::test]
    async fn test_malformed_path_id_is_bad_request() {
        let request = Request::builder()
            .uri("/api/companies/not-a-uuid")
            .header(header::AUTHORIZATION, bearer())
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_category_name_fails_validation() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/job-categories")
            .header(header::AUTHORIZATION, bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":""}"#))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upload_mount_uses_public_url_path() {
        let mut settings = Settings::default();
        settings.storage.local.public_url = "https://cdn.example.com/static/uploads/".to_string();
        settings.storage.local.root_dir = "/var/careers".to_string();
        assert_eq!(
            upload_mount(&settings),
            Some(("/static/uploads".to_string(), "/var/careers".to_string()))
        );

        settings.storage.local.public_url = "https://cdn.example.com".to_string();
        assert_eq!(upload_mount(&settings), None);

        settings.storage.backend = StorageBackend::S3;
        assert_eq!(upload_mount(&settings), None);
    }

    #[test]
    fn test_openapi_lists_every_resource() {
        let openapi = ApiDoc::openapi();
        let tags: Vec<String> = openapi
            .tags
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.name)
            .collect();
        for tag in ["Auth", "Users", "Companies", "Job Categories", "Job Posts", "Health"] {
            assert!(tags.iter().any(|t| t == tag), "missing tag {}", tag);
        }
    }
}
