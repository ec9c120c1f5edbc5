//! Authentication handlers for login and token management.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{
    ApiResponse, ErrorResponse, LoginRequest, LoginResponse, NoData, RefreshTokenRequest,
    TokenResponse, UserResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Routes that work without a token.
///
/// - `POST /login`
/// - `POST /refresh`
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(refresh_token))
}

/// Routes for the signed-in caller; mount behind the auth middleware.
///
/// - `GET /me`
/// - `POST /logout`
pub fn session_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(me))
        .routes(routes!(logout))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let (user, tokens) = state.services.auth.login(&req.email, &req.password).await?;

    let response = LoginResponse {
        user: user.into(),
        tokens: tokens.into(),
    };
    Ok(Json(ApiResponse::ok("Login successful", response)))
}

#[utoipa::path(
    post,
    path = "/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    )
)]
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let tokens = state.services.auth.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::ok("Token refreshed successfully", tokens.into())))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.auth.current_user(auth.id).await?;
    Ok(Json(ApiResponse::ok(
        "User retrieved successfully",
        user.into(),
    )))
}

/// Tokens are stateless; clients drop them on logout.
#[utoipa::path(
    post,
    path = "/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged out", body = ApiResponse<NoData>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn logout(auth: AuthUser) -> Json<ApiResponse<NoData>> {
    tracing::info!(user_id = %auth.id, "User logged out");
    Json(ApiResponse::message("Logout successful"))
}
