//! Service layer for business logic operations.
//!
//! Services encapsulate business rules and coordinate between
//! repositories, image storage and handlers.

mod auth_service;
mod company_service;
mod job_category_service;
mod job_post_service;
mod user_service;

pub use auth_service::AuthService;
pub use company_service::CompanyService;
pub use job_category_service::JobCategoryService;
pub use job_post_service::JobPostService;
pub use user_service::{RegisterUser, UserService};

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::repositories::Repositories;
use crate::storage::ImageStorage;

/// Aggregates all services; cloning is cheap.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub companies: CompanyService,
    pub job_categories: JobCategoryService,
    pub job_posts: JobPostService,
}

impl Services {
    pub fn new(repos: Repositories, storage: Arc<dyn ImageStorage>, jwt: JwtConfig) -> Self {
        Self {
            auth: AuthService::new(repos.users.clone(), jwt),
            users: UserService::new(repos.users, storage.clone()),
            companies: CompanyService::new(repos.companies.clone(), storage.clone()),
            job_categories: JobCategoryService::new(repos.job_categories),
            job_posts: JobPostService::new(repos.job_posts, repos.companies, storage),
        }
    }
}
