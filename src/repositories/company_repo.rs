//! Company repository for async database operations.

use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Company, NewCompany, UpdateCompany};
use crate::repositories::contains_pattern;
use crate::schema::companies;

#[derive(Clone)]
pub struct CompanyRepository {
    pool: AsyncDbPool,
}

impl CompanyRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_company: NewCompany) -> AppResult<Company> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(companies::table)
            .values(&new_company)
            .returning(Company::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Finds a live (not soft-deleted) company.
    pub async fn find_by_id(&self, company_id: Uuid) -> AppResult<Option<Company>> {
        use crate::schema::companies::dsl::*;
        let mut conn = self.pool.get().await?;

        companies
            .filter(id.eq(company_id))
            .filter(deleted_at.is_null())
            .select(Company::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Loads the live companies among `ids`, in no particular order.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Company>> {
        use crate::schema::companies::dsl::*;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await?;

        companies
            .filter(id.eq_any(ids))
            .filter(deleted_at.is_null())
            .select(Company::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Lists live companies, newest first, optionally filtered by name.
    ///
    /// # Returns
    /// Tuple of (companies on this page, total matching count)
    pub async fn list(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Company>, i64)> {
        let mut conn = self.pool.get().await?;

        let items = live_companies(search)
            .order((companies::created_at.desc(), companies::id))
            .offset(offset)
            .limit(limit)
            .select(Company::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = live_companies(search)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((items, total))
    }

    /// Returns `None` when no live company has `company_id`.
    pub async fn update(
        &self,
        company_id: Uuid,
        changes: UpdateCompany,
    ) -> AppResult<Option<Company>> {
        use crate::schema::companies::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(companies.filter(id.eq(company_id)).filter(deleted_at.is_null()))
            .set((&changes, updated_at.eq(now)))
            .returning(Company::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn set_logo(
        &self,
        company_id: Uuid,
        logo_url: Option<String>,
    ) -> AppResult<Option<Company>> {
        use crate::schema::companies::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(companies.filter(id.eq(company_id)).filter(deleted_at.is_null()))
            .set((logo.eq(logo_url), updated_at.eq(now)))
            .returning(Company::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Marks the company deleted. Returns `false` if it was not live.
    pub async fn soft_delete(&self, company_id: Uuid) -> AppResult<bool> {
        use crate::schema::companies::dsl::*;
        let mut conn = self.pool.get().await?;

        let affected =
            diesel::update(companies.filter(id.eq(company_id)).filter(deleted_at.is_null()))
                .set((deleted_at.eq(now.nullable()), updated_at.eq(now)))
                .execute(&mut conn)
                .await
                .map_err(AppError::from)?;

        Ok(affected > 0)
    }
}

fn live_companies(search: Option<&str>) -> companies::BoxedQuery<'static, Pg> {
    let mut query = companies::table
        .filter(companies::deleted_at.is_null())
        .into_boxed();
    if let Some(term) = search {
        query = query.filter(companies::name.ilike(contains_pattern(term)));
    }
    query
}
