mod company;
mod job_category;
mod job_post;
mod job_post_category;
mod user;

pub use company::{Company, NewCompany, UpdateCompany};
pub use job_category::{JobCategory, JobCategoryForm};
pub use job_post::{JobPost, JobPostDetails, NewJobPost, UpdateJobPost};
pub use job_post_category::{
    JobPostCategory, JobPostCategorySpec, NamedJobPostCategory, NewJobPostCategory,
};
pub use user::{NewUser, UpdateUser, User, UserRole};
