use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::format_timestamp;
use crate::models::{JobCategory, JobCategoryForm};

/// Create and update payload; a category only has a name.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JobCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Engineering", max_length = 100)]
    pub name: String,
}

impl From<JobCategoryRequest> for JobCategoryForm {
    fn from(req: JobCategoryRequest) -> Self {
        Self {
            name: req.name.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobCategoryResponse {
    pub id: Uuid,
    #[schema(example = "Engineering")]
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<JobCategory> for JobCategoryResponse {
    fn from(category: JobCategory) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: format_timestamp(&category.created_at),
            updated_at: format_timestamp(&category.updated_at),
        }
    }
}
