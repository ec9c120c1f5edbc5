//! Repository layer for data access operations.
//!
//! Soft-deleted rows are invisible to every read and write here.

mod company_repo;
mod job_category_repo;
mod job_post_repo;
mod user_repo;

pub use company_repo::CompanyRepository;
pub use job_category_repo::JobCategoryRepository;
pub use job_post_repo::{JobPostFilter, JobPostRepository};
pub use user_repo::{UniqueUserField, UserRepository};

use crate::db::AsyncDbPool;

/// Aggregates all repositories; cloning is cheap because the pool is shared.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub companies: CompanyRepository,
    pub job_categories: JobCategoryRepository,
    pub job_posts: JobPostRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            companies: CompanyRepository::new(pool.clone()),
            job_categories: JobCategoryRepository::new(pool.clone()),
            job_posts: JobPostRepository::new(pool),
        }
    }
}

/// `ILIKE` pattern matching `term` anywhere, with LIKE wildcards in `term` escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
