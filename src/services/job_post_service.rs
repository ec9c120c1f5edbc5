//! Job post service.
//!
//! Checks that the referenced company exists before handing writes to the
//! repository. The repository validates categories and applies category
//! changes inside one transaction.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Company, JobPost, JobPostCategorySpec, JobPostDetails, NewJobPost, UpdateJobPost};
use crate::repositories::{CompanyRepository, JobPostFilter, JobPostRepository};
use crate::storage::{ImageFile, ImageStorage};

const THUMBNAIL_FOLDER: &str = "jobposts";

#[derive(Clone)]
pub struct JobPostService {
    posts: JobPostRepository,
    companies: CompanyRepository,
    storage: Arc<dyn ImageStorage>,
}

impl JobPostService {
    pub fn new(
        posts: JobPostRepository,
        companies: CompanyRepository,
        storage: Arc<dyn ImageStorage>,
    ) -> Self {
        Self {
            posts,
            companies,
            storage,
        }
    }

    pub async fn create_post(
        &self,
        new_post: NewJobPost,
        categories: Vec<JobPostCategorySpec>,
    ) -> AppResult<JobPostDetails> {
        self.ensure_company_exists(new_post.company_id).await?;

        let details = self.posts.create_with_categories(new_post, categories).await?;
        tracing::info!(
            job_post_id = %details.post.id,
            categories = details.categories.len(),
            "Job post created"
        );
        Ok(details)
    }

    pub async fn get_post(&self, id: Uuid) -> AppResult<JobPostDetails> {
        self.posts
            .find_details(id)
            .await?
            .ok_or_else(|| AppError::not_found("job_post", "id", id))
    }

    /// Lists posts with their named categories and, when still live, their
    /// company.
    pub async fn list_posts(
        &self,
        filter: &JobPostFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<JobPostDetails>, i64)> {
        let (posts, total) = self.posts.list(filter, offset, limit).await?;

        let company_ids: Vec<Uuid> = posts
            .iter()
            .map(|p| p.company_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let companies: HashMap<Uuid, Company> = self
            .companies
            .find_by_ids(&company_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut categories = self.posts.categories_for(&post_ids).await?;

        let items = posts
            .into_iter()
            .map(|post| JobPostDetails {
                company: companies.get(&post.company_id).cloned(),
                categories: categories.remove(&post.id).unwrap_or_default(),
                post,
            })
            .collect();

        Ok((items, total))
    }

    /// Updates a post; `Some(categories)` replaces its category rows.
    pub async fn update_post(
        &self,
        id: Uuid,
        changes: UpdateJobPost,
        categories: Option<Vec<JobPostCategorySpec>>,
    ) -> AppResult<JobPostDetails> {
        if let Some(company_id) = changes.company_id {
            self.ensure_company_exists(company_id).await?;
        }

        self.posts
            .update_with_categories(id, changes, categories)
            .await?
            .ok_or_else(|| AppError::not_found("job_post", "id", id))
    }

    /// Stores `thumbnail` and swaps it in, removing the previous one.
    pub async fn update_thumbnail(&self, id: Uuid, thumbnail: ImageFile) -> AppResult<JobPost> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("job_post", "id", id))?;
        let url = self.storage.upload(thumbnail, THUMBNAIL_FOLDER).await?;

        match self.posts.set_thumbnail(id, Some(url.clone())).await {
            Ok(Some(updated)) => {
                if let Some(old) = post.thumbnail {
                    self.storage.delete(&old).await;
                }
                Ok(updated)
            }
            Ok(None) => {
                self.storage.delete(&url).await;
                Err(AppError::not_found("job_post", "id", id))
            }
            Err(e) => {
                self.storage.delete(&url).await;
                Err(e)
            }
        }
    }

    pub async fn delete_post(&self, id: Uuid) -> AppResult<()> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("job_post", "id", id))?;
        if !self.posts.soft_delete(id).await? {
            return Err(AppError::not_found("job_post", "id", id));
        }
        if let Some(thumbnail) = post.thumbnail {
            self.storage.delete(&thumbnail).await;
        }
        tracing::info!(job_post_id = %id, "Job post deleted");
        Ok(())
    }

    async fn ensure_company_exists(&self, company_id: Uuid) -> AppResult<()> {
        if self.companies.find_by_id(company_id).await?.is_none() {
            return Err(AppError::Validation {
                field: "company_id".to_string(),
                reason: format!("Company {} does not exist", company_id),
            });
        }
        Ok(())
    }
}
