//! Job post repository.
//!
//! Posts own their category rows; writes that touch both run in one
//! transaction so a failed category sync leaves the post untouched.
//! Referenced categories are share-locked inside that transaction, so a
//! concurrent soft delete either waits for the commit or makes the write
//! fail validation.

use std::collections::{HashMap, HashSet};

use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    Company, JobPost, JobPostCategory, JobPostCategorySpec, JobPostDetails,
    NamedJobPostCategory, NewJobPost, NewJobPostCategory, UpdateJobPost,
};
use crate::reconcile::{KeyedDiff, diff_by_key};
use crate::repositories::contains_pattern;
use crate::schema::{companies, job_categories, job_post_categories, job_posts};

/// Filters accepted by [`JobPostRepository::list`]
#[derive(Debug, Clone, Default)]
pub struct JobPostFilter {
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    pub company_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct JobPostRepository {
    pool: AsyncDbPool,
}

impl JobPostRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Inserts a post together with its category rows.
    pub async fn create_with_categories(
        &self,
        new_post: NewJobPost,
        categories: Vec<JobPostCategorySpec>,
    ) -> AppResult<JobPostDetails> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                lock_live_categories(conn, &categories).await?;
                // A fresh post has no rows, so this only rejects repeats
                let diff = category_diff(Vec::new(), categories)?;

                let post = diesel::insert_into(job_posts::table)
                    .values(&new_post)
                    .returning(JobPost::as_returning())
                    .get_result(conn)
                    .await?;

                apply_category_diff(conn, post.id, diff).await?;
                Ok(load_details(conn, post).await?)
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn find_by_id(&self, post_id: Uuid) -> AppResult<Option<JobPost>> {
        use crate::schema::job_posts::dsl::*;
        let mut conn = self.pool.get().await?;

        job_posts
            .filter(id.eq(post_id))
            .filter(deleted_at.is_null())
            .select(JobPost::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Loads a live post with its company and category rows.
    pub async fn find_details(&self, post_id: Uuid) -> AppResult<Option<JobPostDetails>> {
        use crate::schema::job_posts::dsl::*;
        let mut conn = self.pool.get().await?;

        let post = job_posts
            .filter(id.eq(post_id))
            .filter(deleted_at.is_null())
            .select(JobPost::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        match post {
            Some(post) => Ok(Some(load_details(&mut conn, post).await?)),
            None => Ok(None),
        }
    }

    /// Lists live posts, newest first.
    ///
    /// # Returns
    /// Tuple of (posts on this page, total matching count)
    pub async fn list(
        &self,
        filter: &JobPostFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<JobPost>, i64)> {
        let mut conn = self.pool.get().await?;

        let items = live_posts(filter)
            .order((job_posts::created_at.desc(), job_posts::id))
            .offset(offset)
            .limit(limit)
            .select(JobPost::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = live_posts(filter)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((items, total))
    }

    /// Named category links of `post_ids`, grouped by post.
    pub async fn categories_for(
        &self,
        post_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<NamedJobPostCategory>>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get().await?;
        let rows = load_categories(&mut conn, post_ids.to_vec()).await?;
        Ok(group_by_post(rows))
    }

    /// Updates a post and, when `categories` is given, replaces its category
    /// rows with the submitted list.
    ///
    /// Rows whose category is no longer listed are deleted, rows that stay
    /// are overwritten from the submission, and new categories are inserted.
    /// Returns `None` when no live post has `post_id`.
    pub async fn update_with_categories(
        &self,
        post_id: Uuid,
        changes: UpdateJobPost,
        categories: Option<Vec<JobPostCategorySpec>>,
    ) -> AppResult<Option<JobPostDetails>> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, AppError, _>(|conn| {
            async move {
                let post = diesel::update(
                    job_posts::table
                        .filter(job_posts::id.eq(post_id))
                        .filter(job_posts::deleted_at.is_null()),
                )
                .set((&changes, job_posts::updated_at.eq(now)))
                .returning(JobPost::as_returning())
                .get_result(conn)
                .await
                .optional()?;

                let Some(post) = post else {
                    return Ok(None);
                };

                if let Some(categories) = categories {
                    lock_live_categories(conn, &categories).await?;
                    let persisted = JobPostCategory::belonging_to(&post)
                        .select(JobPostCategory::as_select())
                        .for_update()
                        .load(conn)
                        .await?;
                    let diff = category_diff(persisted, categories)?;
                    apply_category_diff(conn, post.id, diff).await?;
                }

                Ok(Some(load_details(conn, post).await?))
            }
            .scope_boxed()
        })
        .await
    }

    pub async fn set_thumbnail(
        &self,
        post_id: Uuid,
        thumbnail_url: Option<String>,
    ) -> AppResult<Option<JobPost>> {
        use crate::schema::job_posts::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(job_posts.filter(id.eq(post_id)).filter(deleted_at.is_null()))
            .set((thumbnail.eq(thumbnail_url), updated_at.eq(now)))
            .returning(JobPost::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Marks the post deleted; its category rows are kept for history.
    pub async fn soft_delete(&self, post_id: Uuid) -> AppResult<bool> {
        use crate::schema::job_posts::dsl::*;
        let mut conn = self.pool.get().await?;

        let affected =
            diesel::update(job_posts.filter(id.eq(post_id)).filter(deleted_at.is_null()))
                .set((deleted_at.eq(now.nullable()), updated_at.eq(now)))
                .execute(&mut conn)
                .await
                .map_err(AppError::from)?;

        Ok(affected > 0)
    }
}

type CategoryDiff = KeyedDiff<JobPostCategory, JobPostCategorySpec>;

/// Pairs persisted category rows with the submitted specs by category id.
fn category_diff(
    persisted: Vec<JobPostCategory>,
    submitted: Vec<JobPostCategorySpec>,
) -> AppResult<CategoryDiff> {
    diff_by_key(
        persisted,
        submitted,
        |row| row.job_category_id,
        |spec| spec.job_category_id,
    )
    .map_err(AppError::from)
}

async fn apply_category_diff(
    conn: &mut AsyncPgConnection,
    post_id: Uuid,
    diff: CategoryDiff,
) -> QueryResult<()> {
    if diff.is_empty() {
        return Ok(());
    }
    tracing::debug!(
        job_post_id = %post_id,
        deleted = diff.to_delete.len(),
        updated = diff.to_update.len(),
        inserted = diff.to_insert.len(),
        "Syncing job post categories"
    );

    if !diff.to_delete.is_empty() {
        let ids: Vec<Uuid> = diff.to_delete.iter().map(|row| row.id).collect();
        diesel::delete(job_post_categories::table.filter(job_post_categories::id.eq_any(ids)))
            .execute(conn)
            .await?;
    }

    for (row, spec) in &diff.to_update {
        diesel::update(job_post_categories::table.find(row.id))
            .set((spec, job_post_categories::updated_at.eq(now)))
            .execute(conn)
            .await?;
    }

    if !diff.to_insert.is_empty() {
        let rows: Vec<NewJobPostCategory> = diff
            .to_insert
            .into_iter()
            .map(|spec| NewJobPostCategory::from_spec(post_id, spec))
            .collect();
        diesel::insert_into(job_post_categories::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }

    Ok(())
}

async fn load_details(conn: &mut AsyncPgConnection, post: JobPost) -> QueryResult<JobPostDetails> {
    let company = companies::table
        .filter(companies::id.eq(post.company_id))
        .filter(companies::deleted_at.is_null())
        .select(Company::as_select())
        .first(conn)
        .await
        .optional()?;

    let categories = load_categories(conn, vec![post.id]).await?;

    Ok(JobPostDetails {
        post,
        company,
        categories,
    })
}

/// Category links of the given posts joined with the category name, oldest
/// link first. Soft-deleted categories keep their name on existing links.
async fn load_categories(
    conn: &mut AsyncPgConnection,
    post_ids: Vec<Uuid>,
) -> QueryResult<Vec<NamedJobPostCategory>> {
    let rows = job_post_categories::table
        .inner_join(job_categories::table)
        .filter(job_post_categories::job_post_id.eq_any(post_ids))
        .order((
            job_post_categories::created_at.asc(),
            job_post_categories::id.asc(),
        ))
        .select((JobPostCategory::as_select(), job_categories::name))
        .load::<(JobPostCategory, String)>(conn)
        .await?;

    Ok(rows.into_iter().map(NamedJobPostCategory::from).collect())
}

/// Keeps each post's links in load order.
fn group_by_post(rows: Vec<NamedJobPostCategory>) -> HashMap<Uuid, Vec<NamedJobPostCategory>> {
    let mut grouped: HashMap<Uuid, Vec<NamedJobPostCategory>> = HashMap::new();
    for row in rows {
        grouped.entry(row.link.job_post_id).or_default().push(row);
    }
    grouped
}

/// Share-locks the live categories that `specs` reference and rejects the
/// write when any of them is missing or soft-deleted.
async fn lock_live_categories(
    conn: &mut AsyncPgConnection,
    specs: &[JobPostCategorySpec],
) -> AppResult<()> {
    if specs.is_empty() {
        return Ok(());
    }
    let requested: Vec<Uuid> = specs
        .iter()
        .map(|s| s.job_category_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let found: HashSet<Uuid> = job_categories::table
        .filter(job_categories::id.eq_any(requested))
        .filter(job_categories::deleted_at.is_null())
        .select(job_categories::id)
        .for_share()
        .load::<Uuid>(conn)
        .await?
        .into_iter()
        .collect();

    let missing = missing_ids(specs.iter().map(|s| s.job_category_id), &found);
    if !missing.is_empty() {
        return Err(AppError::Validation {
            field: "categories".to_string(),
            reason: format!("Unknown job categories: {}", missing.join(", ")),
        });
    }
    Ok(())
}

/// Ids from `requested` absent from `found`, first-seen order, no repeats.
fn missing_ids(requested: impl Iterator<Item = Uuid>, found: &HashSet<Uuid>) -> Vec<String> {
    let mut seen = HashSet::new();
    requested
        .filter(|id| !found.contains(id) && seen.insert(*id))
        .map(|id| id.to_string())
        .collect()
}

fn live_posts(filter: &JobPostFilter) -> job_posts::BoxedQuery<'static, Pg> {
    let mut query = job_posts::table
        .filter(job_posts::deleted_at.is_null())
        .into_boxed();
    if let Some(term) = &filter.search {
        query = query.filter(job_posts::title.ilike(contains_pattern(term)));
    }
    if let Some(company) = filter.company_id {
        query = query.filter(job_posts::company_id.eq(company));
    }
    query
}
