use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const USER_TAG: &str = "Users";
pub const COMPANY_TAG: &str = "Companies";
pub const JOB_CATEGORY_TAG: &str = "Job Categories";
pub const JOB_POST_TAG: &str = "Job Posts";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Careers",
        description = "Job board API: companies, job posts, job categories and applicants",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
            crate::pagination::PageLink,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Login and token management"),
        (name = USER_TAG, description = "Applicant registration and accounts"),
        (name = COMPANY_TAG, description = "Hiring companies"),
        (name = JOB_CATEGORY_TAG, description = "Categories a job post can be filed under"),
        (name = JOB_POST_TAG, description = "Job posts and their category requirements"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from POST /api/auth/login"))
                        .build(),
                ),
            )
        }
    }
}
