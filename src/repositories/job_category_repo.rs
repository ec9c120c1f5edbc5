//! Job category repository for async database operations.

use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{JobCategory, JobCategoryForm};
use crate::repositories::contains_pattern;
use crate::schema::job_categories;

#[derive(Clone)]
pub struct JobCategoryRepository {
    pool: AsyncDbPool,
}

impl JobCategoryRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, form: JobCategoryForm) -> AppResult<JobCategory> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(job_categories::table)
            .values(&form)
            .returning(JobCategory::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, category_id: Uuid) -> AppResult<Option<JobCategory>> {
        use crate::schema::job_categories::dsl::*;
        let mut conn = self.pool.get().await?;

        job_categories
            .filter(id.eq(category_id))
            .filter(deleted_at.is_null())
            .select(JobCategory::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Finds a live category by exact name, ignoring `exclude_id`.
    pub async fn find_by_name(
        &self,
        category_name: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<Option<JobCategory>> {
        use crate::schema::job_categories::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut query = job_categories
            .filter(name.eq(category_name))
            .filter(deleted_at.is_null())
            .into_boxed();
        if let Some(excluded) = exclude_id {
            query = query.filter(id.ne(excluded));
        }

        query
            .select(JobCategory::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists live categories alphabetically, optionally filtered by name.
    pub async fn list(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<JobCategory>, i64)> {
        let mut conn = self.pool.get().await?;

        let items = live_categories(search)
            .order((job_categories::name.asc(), job_categories::id))
            .offset(offset)
            .limit(limit)
            .select(JobCategory::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = live_categories(search)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((items, total))
    }

    pub async fn update(
        &self,
        category_id: Uuid,
        form: JobCategoryForm,
    ) -> AppResult<Option<JobCategory>> {
        use crate::schema::job_categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(
            job_categories
                .filter(id.eq(category_id))
                .filter(deleted_at.is_null()),
        )
        .set((&form, updated_at.eq(now)))
        .returning(JobCategory::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(AppError::from)
    }

    pub async fn soft_delete(&self, category_id: Uuid) -> AppResult<bool> {
        use crate::schema::job_categories::dsl::*;
        let mut conn = self.pool.get().await?;

        let affected = diesel::update(
            job_categories
                .filter(id.eq(category_id))
                .filter(deleted_at.is_null()),
        )
        .set((deleted_at.eq(now.nullable()), updated_at.eq(now)))
        .execute(&mut conn)
        .await
        .map_err(AppError::from)?;

        Ok(affected > 0)
    }
}

fn live_categories(search: Option<&str>) -> job_categories::BoxedQuery<'static, Pg> {
    let mut query = job_categories::table
        .filter(job_categories::deleted_at.is_null())
        .into_boxed();
    if let Some(term) = search {
        query = query.filter(job_categories::name.ilike(contains_pattern(term)));
    }
    query
}
