pub mod jwt;
mod multipart;
pub mod password;
mod request_url;
mod validate;

pub use multipart::{IMAGE_FIELD, ImageUpload};
pub use request_url::RequestUrl;
pub use validate::{ValidatedJson, ValidatedQuery};
