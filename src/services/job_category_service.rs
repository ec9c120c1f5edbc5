use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{JobCategory, JobCategoryForm};
use crate::repositories::JobCategoryRepository;

#[derive(Clone)]
pub struct JobCategoryService {
    repo: JobCategoryRepository,
}

impl JobCategoryService {
    pub fn new(repo: JobCategoryRepository) -> Self {
        Self { repo }
    }

    pub async fn create_category(&self, form: JobCategoryForm) -> AppResult<JobCategory> {
        self.ensure_name_available(&form.name, None).await?;
        self.repo.create(form).await
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<JobCategory> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("job_category", "id", id))
    }

    pub async fn list_categories(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<JobCategory>, i64)> {
        self.repo.list(search, offset, limit).await
    }

    pub async fn update_category(&self, id: Uuid, form: JobCategoryForm) -> AppResult<JobCategory> {
        self.ensure_name_available(&form.name, Some(id)).await?;
        self.repo
            .update(id, form)
            .await?
            .ok_or_else(|| AppError::not_found("job_category", "id", id))
    }

    pub async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::not_found("job_category", "id", id));
        }
        Ok(())
    }

    async fn ensure_name_available(&self, name: &str, exclude_id: Option<Uuid>) -> AppResult<()> {
        if self.repo.find_by_name(name, exclude_id).await?.is_some() {
            return Err(AppError::Duplicate {
                entity: "job_category".to_string(),
                field: "name".to_string(),
                value: name.to_string(),
            });
        }
        Ok(())
    }
}
