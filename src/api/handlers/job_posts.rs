//! Job post handlers.
//!
//! Create and update accept an optional `categories` list. On update a
//! present list fully replaces the post's category rows inside one
//! transaction; an absent list leaves them untouched.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::JOB_POST_TAG;
use crate::api::dto::{
    ApiResponse, CreateJobPostRequest, ErrorResponse, ImageUploadForm, JobPostListQuery,
    JobPostResponse, NoData, UpdateJobPostRequest,
};
use crate::error::AppResult;
use crate::pagination::PageResult;
use crate::repositories::JobPostFilter;
use crate::state::AppState;
use crate::utils::{ImageUpload, RequestUrl, ValidatedJson, ValidatedQuery};

pub fn job_post_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_posts, create_post))
        .routes(routes!(get_post, update_post, delete_post))
        .routes(routes!(upload_thumbnail))
}

#[utoipa::path(
    get,
    path = "/",
    tag = JOB_POST_TAG,
    params(JobPostListQuery),
    responses(
        (status = 200, description = "Page of job posts with their companies and categories", body = ApiResponse<PageResult<JobPostResponse>>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_posts(
    State(state): State<AppState>,
    url: RequestUrl,
    ValidatedQuery(query): ValidatedQuery<JobPostListQuery>,
) -> AppResult<Json<ApiResponse<PageResult<JobPostResponse>>>> {
    let page = query.page_request()?;
    let filter = JobPostFilter {
        search: query.search().map(str::to_string),
        company_id: query.company_id,
    };
    let (posts, total) = state
        .services
        .job_posts
        .list_posts(&filter, page.offset(), page.limit())
        .await?;

    let result = page
        .into_page(posts, total, &url)?
        .map(JobPostResponse::from);
    Ok(Json(ApiResponse::ok("Job posts retrieved successfully", result)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = JOB_POST_TAG,
    request_body = CreateJobPostRequest,
    responses(
        (status = 201, description = "Job post created", body = ApiResponse<JobPostResponse>),
        (status = 400, description = "Invalid request, unknown company or category", body = ErrorResponse),
        (status = 422, description = "A category is listed more than once", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateJobPostRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<JobPostResponse>>)> {
    let (post, categories) = req.into_parts();
    let details = state.services.job_posts.create_post(post, categories).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Job post created successfully", details.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = JOB_POST_TAG,
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Job post with company and categories", body = ApiResponse<JobPostResponse>),
        (status = 404, description = "Job post not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobPostResponse>>> {
    let details = state.services.job_posts.get_post(id).await?;
    Ok(Json(ApiResponse::ok(
        "Job post retrieved successfully",
        details.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = JOB_POST_TAG,
    params(("id" = Uuid, Path, description = "Job post ID")),
    request_body = UpdateJobPostRequest,
    responses(
        (status = 200, description = "Job post updated", body = ApiResponse<JobPostResponse>),
        (status = 400, description = "Invalid request, unknown company or category", body = ErrorResponse),
        (status = 404, description = "Job post not found", body = ErrorResponse),
        (status = 422, description = "A category is listed more than once", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateJobPostRequest>,
) -> AppResult<Json<ApiResponse<JobPostResponse>>> {
    let (changes, categories) = req.into_parts();
    let details = state
        .services
        .job_posts
        .update_post(id, changes, categories)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Job post updated successfully",
        details.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = JOB_POST_TAG,
    params(("id" = Uuid, Path, description = "Job post ID")),
    responses(
        (status = 200, description = "Job post deleted", body = ApiResponse<NoData>),
        (status = 404, description = "Job post not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<NoData>>> {
    state.services.job_posts.delete_post(id).await?;
    Ok(Json(ApiResponse::message("Job post deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/{id}/thumbnail",
    tag = JOB_POST_TAG,
    params(("id" = Uuid, Path, description = "Job post ID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail replaced", body = ApiResponse<JobPostResponse>),
        (status = 400, description = "Missing, empty, oversized or unsupported image", body = ErrorResponse),
        (status = 404, description = "Job post not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn upload_thumbnail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ImageUpload(image): ImageUpload,
) -> AppResult<Json<ApiResponse<JobPostResponse>>> {
    let post = state.services.job_posts.update_thumbnail(id, image).await?;
    Ok(Json(ApiResponse::ok(
        "Thumbnail updated successfully",
        post.into(),
    )))
}
