//! User repository for async database operations.
//!
//! Every read ignores soft-deleted rows.

use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User, UserRole};
use crate::repositories::contains_pattern;
use crate::schema::users;

/// User repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning the repository is cheap.
#[derive(Clone)]
pub struct UserRepository {
    pool: AsyncDbPool,
}

impl UserRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Creates a new user.
    ///
    /// # Returns
    /// The created user with generated id and timestamps
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(id.eq(user_id))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn find_by_email(&self, user_email: &str) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        users
            .filter(email.eq(user_email))
            .filter(deleted_at.is_null())
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Checks whether another live user already owns `value` in `field`.
    pub async fn is_taken(
        &self,
        field: UniqueUserField,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<bool> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut query = users.filter(deleted_at.is_null()).into_boxed();
        query = match field {
            UniqueUserField::Email => query.filter(email.eq(value)),
            UniqueUserField::Phone => query.filter(phone.eq(value)),
        };
        if let Some(excluded) = exclude_id {
            query = query.filter(id.ne(excluded));
        }

        let count = query
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;
        Ok(count > 0)
    }

    /// Lists live users with `role`, newest first; `search` matches name or email.
    ///
    /// # Returns
    /// Tuple of (users on this page, total matching count)
    pub async fn list_by_role(
        &self,
        role: UserRole,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let mut conn = self.pool.get().await?;

        let items = live_users(role, search)
            .order((users::created_at.desc(), users::id))
            .offset(offset)
            .limit(limit)
            .select(User::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = live_users(role, search)
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((items, total))
    }

    /// Applies `update_data`; `None` fields are ignored.
    ///
    /// Returns `None` when no live user has `user_id`.
    pub async fn update(&self, user_id: Uuid, update_data: UpdateUser) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)).filter(deleted_at.is_null()))
            .set((&update_data, updated_at.eq(now)))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn set_photo(&self, user_id: Uuid, photo_url: Option<String>) -> AppResult<Option<User>> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(users.filter(id.eq(user_id)).filter(deleted_at.is_null()))
            .set((photo.eq(photo_url), updated_at.eq(now)))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Marks the user deleted. Returns `false` if the user was not live.
    pub async fn soft_delete(&self, user_id: Uuid) -> AppResult<bool> {
        use crate::schema::users::dsl::*;
        let mut conn = self.pool.get().await?;

        let affected = diesel::update(users.filter(id.eq(user_id)).filter(deleted_at.is_null()))
            .set((deleted_at.eq(now.nullable()), updated_at.eq(now)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok(affected > 0)
    }
}

/// Columns that must be unique among live users
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueUserField {
    Email,
    Phone,
}

impl UniqueUserField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueUserField::Email => "email",
            UniqueUserField::Phone => "phone",
        }
    }
}

fn live_users(role: UserRole, search: Option<&str>) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table
        .filter(users::deleted_at.is_null())
        .filter(users::role.eq(role))
        .into_boxed();
    if let Some(term) = search {
        let pattern = contains_pattern(term);
        query = query.filter(
            users::name
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern)),
        );
    }
    query
}
