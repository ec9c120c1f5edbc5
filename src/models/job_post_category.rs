use diesel::prelude::*;
use jiff_diesel::DateTime;
use uuid::Uuid;

use crate::models::JobPost;

/// Link row between a job post and a job category
#[derive(Debug, Queryable, Selectable, Identifiable, Associations, Clone, PartialEq)]
#[diesel(belongs_to(JobPost))]
#[diesel(table_name = crate::schema::job_post_categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobPostCategory {
    pub id: Uuid,
    pub job_post_id: Uuid,
    pub job_category_id: Uuid,
    #[diesel(column_name = type_)]
    pub category_type: String,
    pub required_count: i32,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// A category link together with the linked category's name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedJobPostCategory {
    pub link: JobPostCategory,
    pub category_name: String,
}

impl From<(JobPostCategory, String)> for NamedJobPostCategory {
    fn from((link, category_name): (JobPostCategory, String)) -> Self {
        Self {
            link,
            category_name,
        }
    }
}

/// Desired state of one category link, keyed by `job_category_id`.
///
/// Applied as a changeset it overwrites every field, including clearing
/// optional text that the submission leaves out.
#[derive(Debug, AsChangeset, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::job_post_categories)]
#[diesel(treat_none_as_null = true)]
pub struct JobPostCategorySpec {
    pub job_category_id: Uuid,
    #[diesel(column_name = type_)]
    pub category_type: String,
    pub required_count: i32,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::job_post_categories)]
pub struct NewJobPostCategory {
    pub job_post_id: Uuid,
    pub job_category_id: Uuid,
    #[diesel(column_name = type_)]
    pub category_type: String,
    pub required_count: i32,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
}

impl NewJobPostCategory {
    pub fn from_spec(job_post_id: Uuid, spec: JobPostCategorySpec) -> Self {
        Self {
            job_post_id,
            job_category_id: spec.job_category_id,
            category_type: spec.category_type,
            required_count: spec.required_count,
            description: spec.description,
            requirements: spec.requirements,
            benefits: spec.benefits,
        }
    }
}
