//! User service for business logic operations.
//!
//! Wraps the repository with uniqueness checks, password hashing and
//! photo storage.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UpdateUser, User, UserRole};
use crate::repositories::{UniqueUserField, UserRepository};
use crate::storage::{ImageFile, ImageStorage};
use crate::utils::password::{hash_password, verify_password};

const PHOTO_FOLDER: &str = "users";

/// Registration input with the plain-text password
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub password: String,
}

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    storage: Arc<dyn ImageStorage>,
}

impl UserService {
    pub fn new(repo: UserRepository, storage: Arc<dyn ImageStorage>) -> Self {
        Self { repo, storage }
    }

    /// Registers an applicant account.
    pub async fn register(&self, input: RegisterUser) -> AppResult<User> {
        self.ensure_available(UniqueUserField::Email, &input.email, None)
            .await?;
        self.ensure_available(UniqueUserField::Phone, &input.phone, None)
            .await?;

        let user = self
            .repo
            .create(NewUser {
                name: input.name,
                phone: input.phone,
                email: input.email,
                address: input.address,
                description: input.description,
                password: hash_password(&input.password)?,
                role: UserRole::Applicant,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Gets a live user by id, or `NotFound`.
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        live_user(self.repo.find_by_id(id).await?, id)
    }

    /// Lists applicants with pagination.
    ///
    /// # Returns
    /// A tuple of (users, total_count)
    pub async fn list_applicants(
        &self,
        search: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        self.repo
            .list_by_role(UserRole::Applicant, search, offset, limit)
            .await
    }

    /// Updates profile fields; a present `password` is re-hashed.
    pub async fn update_user(&self, id: Uuid, mut changes: UpdateUser) -> AppResult<User> {
        if let Some(email) = &changes.email {
            self.ensure_available(UniqueUserField::Email, email, Some(id))
                .await?;
        }
        if let Some(phone) = &changes.phone {
            self.ensure_available(UniqueUserField::Phone, phone, Some(id))
                .await?;
        }
        if let Some(password) = changes.password.take() {
            changes.password = Some(hash_password(&password)?);
        }

        live_user(self.repo.update(id, changes).await?, id)
    }

    /// Replaces the password after checking the current one.
    pub async fn change_password(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.get_user(id).await?;
        if !verify_password(current_password, &user.password)? {
            return Err(AppError::Validation {
                field: "current_password".to_string(),
                reason: "Current password is incorrect".to_string(),
            });
        }

        let changes = UpdateUser {
            password: Some(hash_password(new_password)?),
            ..Default::default()
        };
        // The row can be soft-deleted between the lookup and the update.
        live_user(self.repo.update(id, changes).await?, id)?;
        tracing::info!(user_id = %id, "Password changed");
        Ok(())
    }

    /// Stores `photo` and makes it the user's photo, removing the previous one.
    pub async fn update_photo(&self, id: Uuid, photo: ImageFile) -> AppResult<User> {
        let user = self.get_user(id).await?;
        let url = self.storage.upload(photo, PHOTO_FOLDER).await?;

        match self.repo.set_photo(id, Some(url.clone())).await {
            Ok(Some(updated)) => {
                if let Some(old) = user.photo {
                    self.storage.delete(&old).await;
                }
                Ok(updated)
            }
            Ok(None) => {
                self.storage.delete(&url).await;
                Err(AppError::not_found("user", "id", id))
            }
            Err(e) => {
                self.storage.delete(&url).await;
                Err(e)
            }
        }
    }

    /// Soft-deletes the user and removes their stored photo.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let user = self.get_user(id).await?;
        if !self.repo.soft_delete(id).await? {
            return Err(AppError::not_found("user", "id", id));
        }
        if let Some(photo) = user.photo {
            self.storage.delete(&photo).await;
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn ensure_available(
        &self,
        field: UniqueUserField,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> AppResult<()> {
        if self.repo.is_taken(field, value, exclude_id).await? {
            return Err(AppError::Duplicate {
                entity: "user".to_string(),
                field: field.as_str().to_string(),
                value: value.to_string(),
            });
        }
        Ok(())
    }
}

/// A lookup or update that matched no live row means the user is gone.
fn live_user(row: Option<User>, id: Uuid) -> AppResult<User> {
    row.ok_or_else(|| AppError::not_found("user", "id", id))
}
