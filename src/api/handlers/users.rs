//! User registration and management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    ApiResponse, ChangePasswordRequest, ErrorResponse, ImageUploadForm, ListQuery, NoData,
    RegisterUserRequest, UpdateUserRequest, UserResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::pagination::PageResult;
use crate::state::AppState;
use crate::utils::{ImageUpload, RequestUrl, ValidatedJson, ValidatedQuery};

/// Public registration, `POST /`.
pub fn registration_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(register_user))
}

/// Authenticated user routes.
///
/// - `GET /` list applicants
/// - `GET|PUT|DELETE /{id}`
/// - `POST /{id}/change-password`
/// - `POST /{id}/photo`
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(get_user, update_user, delete_user))
        .routes(routes!(change_password))
        .routes(routes!(upload_photo))
}

/// Users may change their own account; admins may change any.
fn ensure_self_or_admin(auth: &AuthUser, id: Uuid) -> AppResult<()> {
    if auth.id == id || auth.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden {
            message: "You can only modify your own account".to_string(),
        })
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email or phone already registered", body = ErrorResponse)
    )
)]
async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserResponse>>)> {
    let user = state.services.users.register(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User registered successfully", user.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "Page of applicants", body = ApiResponse<PageResult<UserResponse>>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_users(
    State(state): State<AppState>,
    url: RequestUrl,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> AppResult<Json<ApiResponse<PageResult<UserResponse>>>> {
    let page = query.page_request()?;
    let (users, total) = state
        .services
        .users
        .list_applicants(query.search(), page.offset(), page.limit())
        .await?;

    let result = page.into_page(users, total, &url)?.map(UserResponse::from);
    Ok(Json(ApiResponse::ok("Users retrieved successfully", result)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(ApiResponse::ok("User retrieved successfully", user.into())))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email or phone already registered", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    ensure_self_or_admin(&auth, id)?;
    let user = state.services.users.update_user(id, req.into()).await?;
    Ok(Json(ApiResponse::ok("User updated successfully", user.into())))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<NoData>),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<NoData>>> {
    ensure_self_or_admin(&auth, id)?;
    state.services.users.delete_user(id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/{id}/change-password",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<NoData>),
        (status = 400, description = "Wrong current password or mismatch", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<NoData>>> {
    ensure_self_or_admin(&auth, id)?;
    state
        .services
        .users
        .change_password(id, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(ApiResponse::message("Password changed successfully")))
}

#[utoipa::path(
    post,
    path = "/{id}/photo",
    tag = USER_TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo replaced", body = ApiResponse<UserResponse>),
        (status = 400, description = "Missing, empty, oversized or unsupported image", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn upload_photo(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ImageUpload(image): ImageUpload,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    ensure_self_or_admin(&auth, id)?;
    let user = state.services.users.update_photo(id, image).await?;
    Ok(Json(ApiResponse::ok("Photo updated successfully", user.into())))
}
