use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::JOB_CATEGORY_TAG;
use crate::api::dto::{
    ApiResponse, ErrorResponse, JobCategoryRequest, JobCategoryResponse, ListQuery, NoData,
};
use crate::error::AppResult;
use crate::pagination::PageResult;
use crate::state::AppState;
use crate::utils::{RequestUrl, ValidatedJson, ValidatedQuery};

pub fn job_category_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_categories, create_category))
        .routes(routes!(get_category, update_category, delete_category))
}

#[utoipa::path(
    get,
    path = "/",
    tag = JOB_CATEGORY_TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "Page of job categories", body = ApiResponse<PageResult<JobCategoryResponse>>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_categories(
    State(state): State<AppState>,
    url: RequestUrl,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> AppResult<Json<ApiResponse<PageResult<JobCategoryResponse>>>> {
    let page = query.page_request()?;
    let (categories, total) = state
        .services
        .job_categories
        .list_categories(query.search(), page.offset(), page.limit())
        .await?;

    let result = page
        .into_page(categories, total, &url)?
        .map(JobCategoryResponse::from);
    Ok(Json(ApiResponse::ok(
        "Job categories retrieved successfully",
        result,
    )))
}

#[utoipa::path(
    post,
    path = "/",
    tag = JOB_CATEGORY_TAG,
    request_body = JobCategoryRequest,
    responses(
        (status = 201, description = "Job category created", body = ApiResponse<JobCategoryResponse>),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<JobCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<JobCategoryResponse>>)> {
    let category = state
        .services
        .job_categories
        .create_category(req.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Job category created successfully",
            category.into(),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = JOB_CATEGORY_TAG,
    params(("id" = Uuid, Path, description = "Job category ID")),
    responses(
        (status = 200, description = "Job category found", body = ApiResponse<JobCategoryResponse>),
        (status = 404, description = "Job category not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<JobCategoryResponse>>> {
    let category = state.services.job_categories.get_category(id).await?;
    Ok(Json(ApiResponse::ok(
        "Job category retrieved successfully",
        category.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = JOB_CATEGORY_TAG,
    params(("id" = Uuid, Path, description = "Job category ID")),
    request_body = JobCategoryRequest,
    responses(
        (status = 200, description = "Job category updated", body = ApiResponse<JobCategoryResponse>),
        (status = 404, description = "Job category not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<JobCategoryRequest>,
) -> AppResult<Json<ApiResponse<JobCategoryResponse>>> {
    let category = state
        .services
        .job_categories
        .update_category(id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(
        "Job category updated successfully",
        category.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = JOB_CATEGORY_TAG,
    params(("id" = Uuid, Path, description = "Job category ID")),
    responses(
        (status = 200, description = "Job category deleted", body = ApiResponse<NoData>),
        (status = 404, description = "Job category not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<NoData>>> {
    state.services.job_categories.delete_category(id).await?;
    Ok(Json(ApiResponse::message("Job category deleted successfully")))
}
