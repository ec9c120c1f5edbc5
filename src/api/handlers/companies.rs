//! Company handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::api::doc::COMPANY_TAG;
use crate::api::dto::{
    ApiResponse, CompanyResponse, CreateCompanyRequest, ErrorResponse, ImageUploadForm, ListQuery,
    NoData, UpdateCompanyRequest,
};
use crate::error::AppResult;
use crate::pagination::PageResult;
use crate::state::AppState;
use crate::utils::{ImageUpload, RequestUrl, ValidatedJson, ValidatedQuery};

pub fn company_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_companies, create_company))
        .routes(routes!(get_company, update_company, delete_company))
        .routes(routes!(upload_logo))
}

#[utoipa::path(
    get,
    path = "/",
    tag = COMPANY_TAG,
    params(ListQuery),
    responses(
        (status = 200, description = "Page of companies", body = ApiResponse<PageResult<CompanyResponse>>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_companies(
    State(state): State<AppState>,
    url: RequestUrl,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> AppResult<Json<ApiResponse<PageResult<CompanyResponse>>>> {
    let page = query.page_request()?;
    let (companies, total) = state
        .services
        .companies
        .list_companies(query.search(), page.offset(), page.limit())
        .await?;

    let result = page
        .into_page(companies, total, &url)?
        .map(CompanyResponse::from);
    Ok(Json(ApiResponse::ok("Companies retrieved successfully", result)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = COMPANY_TAG,
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = ApiResponse<CompanyResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_company(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCompanyRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CompanyResponse>>)> {
    let company = state.services.companies.create_company(req.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Company created successfully", company.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = COMPANY_TAG,
    params(("id" = Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company found", body = ApiResponse<CompanyResponse>),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CompanyResponse>>> {
    let company = state.services.companies.get_company(id).await?;
    Ok(Json(ApiResponse::ok(
        "Company retrieved successfully",
        company.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = COMPANY_TAG,
    params(("id" = Uuid, Path, description = "Company ID")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = ApiResponse<CompanyResponse>),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCompanyRequest>,
) -> AppResult<Json<ApiResponse<CompanyResponse>>> {
    let company = state
        .services
        .companies
        .update_company(id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(
        "Company updated successfully",
        company.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = COMPANY_TAG,
    params(("id" = Uuid, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company deleted", body = ApiResponse<NoData>),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<NoData>>> {
    state.services.companies.delete_company(id).await?;
    Ok(Json(ApiResponse::message("Company deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/{id}/logo",
    tag = COMPANY_TAG,
    params(("id" = Uuid, Path, description = "Company ID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Logo replaced", body = ApiResponse<CompanyResponse>),
        (status = 400, description = "Missing, empty, oversized or unsupported image", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn upload_logo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ImageUpload(image): ImageUpload,
) -> AppResult<Json<ApiResponse<CompanyResponse>>> {
    let company = state.services.companies.update_logo(id, image).await?;
    Ok(Json(ApiResponse::ok(
        "Logo updated successfully",
        company.into(),
    )))
}
