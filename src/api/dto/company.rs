//! Company DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::format_timestamp;
use crate::models::{Company, NewCompany, UpdateCompany};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Acme Corp", max_length = 100)]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "hr@acme.example", format = "email")]
    pub email: String,
    #[validate(length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"))]
    pub phone: String,
    #[validate(url(message = "Invalid website URL"))]
    #[schema(example = "https://acme.example", format = "uri")]
    pub website: String,
    #[validate(length(min = 1, max = 500, message = "Address must be between 1 and 500 characters"))]
    pub address: String,
}

impl From<CreateCompanyRequest> for NewCompany {
    fn from(req: CreateCompanyRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            website: req.website,
            address: req.address,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"))]
    pub phone: Option<String>,
    #[validate(url(message = "Invalid website URL"))]
    #[schema(format = "uri")]
    pub website: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Address must be between 1 and 500 characters"))]
    pub address: Option<String>,
}

impl From<UpdateCompanyRequest> for UpdateCompany {
    fn from(req: UpdateCompanyRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            website: req.website,
            address: req.address,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub id: Uuid,
    #[schema(example = "Acme Corp")]
    pub name: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub logo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            email: company.email,
            phone: company.phone,
            website: company.website,
            address: company.address,
            logo: company.logo,
            created_at: format_timestamp(&company.created_at),
            updated_at: format_timestamp(&company.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_must_be_url() {
        let req = UpdateCompanyRequest {
            name: None,
            email: None,
            phone: None,
            website: Some("acme dot com".to_string()),
            address: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("website"));
    }
}
