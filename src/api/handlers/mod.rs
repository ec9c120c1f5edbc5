//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod companies;
pub mod health;
pub mod job_categories;
pub mod job_posts;
pub mod users;
