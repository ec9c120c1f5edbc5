use diesel::prelude::*;
use jiff_diesel::DateTime;
use uuid::Uuid;

use crate::models::{Company, NamedJobPostCategory};

#[derive(Debug, Queryable, Selectable, Identifiable, Associations, Clone)]
#[diesel(belongs_to(Company))]
#[diesel(table_name = crate::schema::job_posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobPost {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
    #[diesel(column_name = type_)]
    pub job_type: String,
    pub status: String,
    pub thumbnail: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub deleted_at: Option<DateTime>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::job_posts)]
pub struct NewJobPost {
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub benefits: String,
    #[diesel(column_name = type_)]
    pub job_type: String,
    pub status: String,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::job_posts)]
pub struct UpdateJobPost {
    pub company_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    #[diesel(column_name = type_)]
    pub job_type: Option<String>,
    pub status: Option<String>,
}

/// A job post with its live company and named category links
#[derive(Debug, Clone)]
pub struct JobPostDetails {
    pub post: JobPost,
    pub company: Option<Company>,
    pub categories: Vec<NamedJobPostCategory>,
}
