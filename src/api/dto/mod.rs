//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs carry `validator` rules and convert into the model or
//! service input types; response DTOs convert from models.

mod auth;
mod company;
mod error;
mod health;
mod job_category;
mod job_post;
mod pagination;
mod response;
mod upload;
mod user;

pub use auth::{LoginRequest, LoginResponse, RefreshTokenRequest, TokenResponse};
pub use company::{CompanyResponse, CreateCompanyRequest, UpdateCompanyRequest};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use job_category::{JobCategoryRequest, JobCategoryResponse};
pub use job_post::{
    CreateJobPostRequest, JobPostCategoryRequest, JobPostCategoryResponse, JobPostResponse,
    UpdateJobPostRequest,
};
pub use pagination::{JobPostListQuery, ListQuery, PageRequest};
pub use response::{ApiResponse, NoData};
pub use upload::ImageUploadForm;
pub use user::{ChangePasswordRequest, RegisterUserRequest, UpdateUserRequest, UserResponse};

/// Timestamps are stored without zone and rendered as ISO 8601 civil time.
pub(crate) fn format_timestamp(value: &jiff_diesel::DateTime) -> String {
    value.to_jiff().to_string()
}

pub(crate) fn format_optional_timestamp(value: Option<&jiff_diesel::DateTime>) -> Option<String> {
    value.map(format_timestamp)
}
