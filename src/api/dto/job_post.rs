//! Job post DTOs, including the category list synced on create and update.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::{CompanyResponse, format_timestamp};
use crate::models::{
    Company, JobPost, JobPostCategorySpec, JobPostDetails, NamedJobPostCategory, NewJobPost,
    UpdateJobPost,
};

fn default_required_count() -> i32 {
    1
}

/// One category row of a job post, keyed by `job_category_id`.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct JobPostCategoryRequest {
    pub job_category_id: Uuid,
    #[validate(length(min = 1, max = 50, message = "Type must be between 1 and 50 characters"))]
    #[serde(rename = "type")]
    #[schema(example = "full-time")]
    pub category_type: String,
    #[serde(default = "default_required_count")]
    #[validate(range(min = 1, message = "Required count must be at least 1"))]
    #[schema(example = 2, minimum = 1)]
    pub required_count: i32,
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 1000, message = "Requirements cannot exceed 1000 characters"))]
    pub requirements: Option<String>,
    #[validate(length(max = 1000, message = "Benefits cannot exceed 1000 characters"))]
    pub benefits: Option<String>,
}

impl From<JobPostCategoryRequest> for JobPostCategorySpec {
    fn from(req: JobPostCategoryRequest) -> Self {
        Self {
            job_category_id: req.job_category_id,
            category_type: req.category_type,
            required_count: req.required_count,
            description: req.description,
            requirements: req.requirements,
            benefits: req.benefits,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateJobPostRequest {
    pub company_id: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[schema(example = "Backend Engineer", max_length = 200)]
    pub title: String,
    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 1000, message = "Requirements must be between 1 and 1000 characters"))]
    pub requirements: String,
    #[validate(length(min = 1, max = 1000, message = "Benefits must be between 1 and 1000 characters"))]
    pub benefits: String,
    #[validate(length(min = 1, max = 50, message = "Type must be between 1 and 50 characters"))]
    #[serde(rename = "type")]
    #[schema(example = "full-time")]
    pub job_type: String,
    #[validate(length(min = 1, max = 50, message = "Status must be between 1 and 50 characters"))]
    #[schema(example = "open")]
    pub status: String,
    #[serde(default)]
    #[validate(nested)]
    pub categories: Vec<JobPostCategoryRequest>,
}

impl CreateJobPostRequest {
    pub fn into_parts(self) -> (NewJobPost, Vec<JobPostCategorySpec>) {
        let post = NewJobPost {
            company_id: self.company_id,
            title: self.title,
            description: self.description,
            requirements: self.requirements,
            benefits: self.benefits,
            job_type: self.job_type,
            status: self.status,
        };
        let categories = self.categories.into_iter().map(Into::into).collect();
        (post, categories)
    }
}

/// Partial update; a present `categories` list replaces the post's categories.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateJobPostRequest {
    pub company_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Description must be between 1 and 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Requirements must be between 1 and 1000 characters"))]
    pub requirements: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Benefits must be between 1 and 1000 characters"))]
    pub benefits: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Type must be between 1 and 50 characters"))]
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Status must be between 1 and 50 characters"))]
    pub status: Option<String>,
    #[validate(nested)]
    pub categories: Option<Vec<JobPostCategoryRequest>>,
}

impl UpdateJobPostRequest {
    pub fn into_parts(self) -> (UpdateJobPost, Option<Vec<JobPostCategorySpec>>) {
        let changes = UpdateJobPost {
            company_id: self.company_id,
            title: self.title,
            description: self.description,
            requirements: self.requirements,
            benefits: self.benefits,
            job_type: self.job_type,
            status: self.status,
        };
        let categories = self
            .categories
            .map(|list| list.into_iter().map(Into::into).collect());
        (changes, categories)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobPostCategoryResponse {
    pub id: Uuid,
    pub job_category_id: Uuid,
    /// Name of the linked job category
    #[schema(example = "Engineering")]
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: String,
    pub required_count: i32,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<NamedJobPostCategory> for JobPostCategoryResponse {
    fn from(named: NamedJobPostCategory) -> Self {
        let row = named.link;
        Self {
            id: row.id,
            job_category_id: row.job_category_id,
            name: named.category_name,
            category_type: row.category_type,
            required_count: row.required_count,
            description: row.description,
            requirements: row.requirements,
            benefits: row.benefits,
            created_at: format_timestamp(&row.created_at),
            updated_at: format_timestamp(&row.updated_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JobPostResponse {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Backend Engineer")]
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub status: String,
    pub thumbnail: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Owning company, `null` once it has been deleted
    pub company: Option<CompanyResponse>,
    /// Omitted from the thumbnail upload response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<JobPostCategoryResponse>>,
}

impl JobPostResponse {
    fn build(
        post: JobPost,
        company: Option<Company>,
        categories: Option<Vec<NamedJobPostCategory>>,
    ) -> Self {
        Self {
            id: post.id,
            company_id: post.company_id,
            title: post.title,
            description: post.description,
            requirements: post.requirements,
            benefits: post.benefits,
            job_type: post.job_type,
            status: post.status,
            thumbnail: post.thumbnail,
            created_at: format_timestamp(&post.created_at),
            updated_at: format_timestamp(&post.updated_at),
            company: company.map(Into::into),
            categories: categories.map(|rows| rows.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<JobPostDetails> for JobPostResponse {
    fn from(details: JobPostDetails) -> Self {
        Self::build(details.post, details.company, Some(details.categories))
    }
}

impl From<JobPost> for JobPostResponse {
    fn from(post: JobPost) -> Self {
        Self::build(post, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_uses_type_key_and_defaults() {
        let req: CreateJobPostRequest = serde_json::from_value(json!({
            "company_id": "6f1c2a3e-2c7b-4a8e-9a57-3f5d0f0a1b2c",
            "title": "Backend Engineer",
            "description": "Build APIs",
            "requirements": "Rust",
            "benefits": "Remote",
            "type": "full-time",
            "status": "open",
            "categories": [
                { "job_category_id": "0b6b1f7e-8f7e-4c1e-b7a4-2e9c1d7c5a10", "type": "senior" }
            ]
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let (post, categories) = req.into_parts();
        assert_eq!(post.job_type, "full-time");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].required_count, 1);
        assert_eq!(categories[0].category_type, "senior");
    }

    #[test]
    fn test_nested_category_errors() {
        let req: UpdateJobPostRequest = serde_json::from_value(json!({
            "categories": [
                { "job_category_id": "0b6b1f7e-8f7e-4c1e-b7a4-2e9c1d7c5a10", "type": "x", "required_count": 0 }
            ]
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_details_embed_named_categories() {
        use crate::models::JobPostCategory;
        use jiff::civil::date;
        use jiff_diesel::ToDiesel;

        let at = date(2025, 3, 1).at(12, 30, 0, 0).to_diesel();
        let post_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let post = JobPost {
            id: post_id,
            company_id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            description: "Build APIs".to_string(),
            requirements: "Rust".to_string(),
            benefits: "Remote".to_string(),
            job_type: "full-time".to_string(),
            status: "open".to_string(),
            thumbnail: None,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        };
        let link = JobPostCategory {
            id: Uuid::new_v4(),
            job_post_id: post_id,
            job_category_id: category_id,
            category_type: "senior".to_string(),
            required_count: 2,
            description: None,
            requirements: Some("5 years".to_string()),
            benefits: None,
            created_at: at,
            updated_at: at,
        };

        let response = JobPostResponse::from(JobPostDetails {
            post,
            company: None,
            categories: vec![NamedJobPostCategory {
                link,
                category_name: "Engineering".to_string(),
            }],
        });
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["type"], "full-time");
        assert!(body["company"].is_null());
        let categories = body["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0]["job_category_id"], category_id.to_string());
        assert_eq!(categories[0]["name"], "Engineering");
        assert_eq!(categories[0]["type"], "senior");
        assert_eq!(categories[0]["required_count"], 2);
        assert_eq!(categories[0]["requirements"], "5 years");
    }

    #[test]
    fn test_absent_categories_leave_rows_alone() {
        let req: UpdateJobPostRequest =
            serde_json::from_value(json!({ "title": "Staff Engineer" })).unwrap();
        let (changes, categories) = req.into_parts();
        assert_eq!(changes.title.as_deref(), Some("Staff Engineer"));
        assert!(categories.is_none());
    }
}
