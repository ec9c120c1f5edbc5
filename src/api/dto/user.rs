//! User DTOs for registration, profile updates and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::{format_optional_timestamp, format_timestamp};
use crate::models::{UpdateUser, User, UserRole};
use crate::services::RegisterUser;

// ============================================================================
// Request DTOs
// ============================================================================

/// Public registration payload; the account gets the `applicant` role.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Jane Doe", max_length = 100)]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"))]
    #[schema(example = "+62812345678")]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com", format = "email")]
    pub email: String,
    #[validate(length(max = 500, message = "Address cannot exceed 500 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    #[schema(format = "password", min_length = 6, max_length = 100)]
    pub password: String,
}

impl From<RegisterUserRequest> for RegisterUser {
    fn from(req: RegisterUserRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            email: req.email,
            address: req.address,
            description: req.description,
            password: req.password,
        }
    }
}

/// Partial profile update; omitted fields stay unchanged.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: Option<String>,
    #[validate(length(max = 500, message = "Address cannot exceed 500 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    #[schema(format = "password")]
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            email: req.email,
            address: req.address,
            description: req.description,
            password: req.password,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    #[schema(format = "password")]
    pub current_password: String,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    #[schema(format = "password", min_length = 6, max_length = 100)]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    #[schema(format = "password")]
    pub confirm_password: String,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// User profile; the password hash is never exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub photo: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub role: UserRole,
    pub verified_at: Option<String>,
    #[schema(example = "2025-01-01T09:00:00")]
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            photo: user.photo,
            name: user.name,
            phone: user.phone,
            email: user.email,
            address: user.address,
            description: user.description,
            role: user.role,
            verified_at: format_optional_timestamp(user.verified_at.as_ref()),
            created_at: format_timestamp(&user.created_at),
            updated_at: format_timestamp(&user.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_must_match() {
        let req = ChangePasswordRequest {
            current_password: "old-secret".to_string(),
            new_password: "new-secret".to_string(),
            confirm_password: "other-secret".to_string(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn test_register_limits() {
        let req = RegisterUserRequest {
            name: "x".repeat(101),
            phone: "0812".to_string(),
            email: "jane@example.com".to_string(),
            address: None,
            description: None,
            password: "12345".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("email"));
    }
}
