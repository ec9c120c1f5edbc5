use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Company, NewCompany, UpdateCompany};
use crate::repositories::CompanyRepository;
use crate::storage::{ImageFile, ImageStorage};

const LOGO_FOLDER: &str = "companies";

#[derive(Clone)]
pub struct CompanyService {
    repo: CompanyRepository,
    storage: Arc<dyn ImageStorage>,
}

impl CompanyService {
    pub fn new(repo: CompanyRepository, storage: Arc<dyn ImageStorage>) -> Self {
        Self { repo, storage }
    }

    pub async fn create_company(&self, new_company: NewCompany) -> AppResult<Company> {
        let company = self.repo.create(new_company).await?;
        tracing::info!(company_id = %company.id, "Company created");
        Ok(company)
    }

    pub async fn get_company(&self, id: Uuid) -> AppResult<Company> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("company", "id", id))
    }

    pub async fn list_companies(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Company>, i64)> {
        self.repo.list(search, offset, limit).await
    }

    pub async fn update_company(&self, id: Uuid, changes: UpdateCompany) -> AppResult<Company> {
        self.repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("company", "id", id))
    }

    /// Stores `logo` and swaps it in, removing the previous logo.
    pub async fn update_logo(&self, id: Uuid, logo: ImageFile) -> AppResult<Company> {
        let company = self.get_company(id).await?;
        let url = self.storage.upload(logo, LOGO_FOLDER).await?;

        match self.repo.set_logo(id, Some(url.clone())).await {
            Ok(Some(updated)) => {
                if let Some(old) = company.logo {
                    self.storage.delete(&old).await;
                }
                Ok(updated)
            }
            Ok(None) => {
                self.storage.delete(&url).await;
                Err(AppError::not_found("company", "id", id))
            }
            Err(e) => {
                self.storage.delete(&url).await;
                Err(e)
            }
        }
    }

    pub async fn delete_company(&self, id: Uuid) -> AppResult<()> {
        let company = self.get_company(id).await?;
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::not_found("company", "id", id));
        }
        if let Some(logo) = company.logo {
            self.storage.delete(&logo).await;
        }
        tracing::info!(company_id = %id, "Company deleted");
        Ok(())
    }
}
