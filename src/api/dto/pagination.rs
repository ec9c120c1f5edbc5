//! Listing query parameters and page assembly.

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::pagination::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE, PageResult, PaginationError, paginate,
};
use crate::utils::RequestUrl;

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

/// A checked `page`/`per_page` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Rejects `page < 1` and `per_page` outside `1..=MAX_PER_PAGE`.
    pub fn new(page: i64, per_page: i64) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidArgument {
                argument: "page",
                reason: format!("must be at least 1, got {}", page),
            });
        }
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(PaginationError::InvalidArgument {
                argument: "per_page",
                reason: format!("must be between 1 and {}, got {}", MAX_PER_PAGE, per_page),
            });
        }
        Ok(Self { page, per_page })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    /// Wraps one repository slice into a page with links for `url`.
    pub fn into_page<T>(self, items: Vec<T>, total: i64, url: &RequestUrl) -> AppResult<PageResult<T>> {
        Ok(paginate(
            items,
            total,
            self.page,
            self.per_page,
            &url.base_url,
            &url.query,
        )?)
    }
}

/// `?page=&per_page=&search=` for simple listings.
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[param(minimum = 1, example = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_per_page")]
    #[param(minimum = 1, maximum = 100, example = 15)]
    pub per_page: i64,

    /// Case-insensitive substring filter
    #[validate(length(max = 100, message = "Search cannot exceed 100 characters"))]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> Result<PageRequest, PaginationError> {
        PageRequest::new(self.page, self.per_page)
    }

    /// The search term, ignoring blank input.
    pub fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }
}

/// Listing parameters for job posts.
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct JobPostListQuery {
    #[serde(default = "default_page")]
    #[param(minimum = 1, example = 1)]
    pub page: i64,

    #[serde(default = "default_per_page")]
    #[param(minimum = 1, maximum = 100, example = 15)]
    pub per_page: i64,

    /// Case-insensitive substring of the title
    #[validate(length(max = 200, message = "Search cannot exceed 200 characters"))]
    pub search: Option<String>,

    /// Only posts of this company
    pub company_id: Option<Uuid>,
}

impl JobPostListQuery {
    pub fn page_request(&self) -> Result<PageRequest, PaginationError> {
        PageRequest::new(self.page, self.per_page)
    }

    pub fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::QueryParams;

    #[test]
    fn test_page_request_bounds() {
        assert_eq!(PageRequest::new(3, 15).unwrap().offset(), 30);
        assert!(matches!(
            PageRequest::new(0, 15),
            Err(PaginationError::InvalidArgument { argument: "page", .. })
        ));
        assert!(matches!(
            PageRequest::new(1, 0),
            Err(PaginationError::InvalidArgument { argument: "per_page", .. })
        ));
        assert!(PageRequest::new(1, MAX_PER_PAGE + 1).is_err());
    }

    #[test]
    fn test_query_defaults_and_blank_search() {
        let query: ListQuery = serde_json::from_value(serde_json::json!({ "search": "  " })).unwrap();
        assert_eq!(query.page, DEFAULT_PAGE);
        assert_eq!(query.per_page, DEFAULT_PER_PAGE);
        assert_eq!(query.search(), None);
    }

    #[test]
    fn test_into_page_keeps_filters_in_links() {
        let url = RequestUrl {
            base_url: "http://localhost/api/job-posts".to_string(),
            query: QueryParams::parse("search=rust&page=2"),
        };
        let page = PageRequest::new(2, 15)
            .unwrap()
            .into_page(vec!["x"; 15], 42, &url)
            .unwrap();

        assert_eq!((page.from, page.to, page.last_page), (16, 30, 3));
        assert_eq!(
            page.next_page_url.as_deref(),
            Some("http://localhost/api/job-posts?search=rust&page=3&per_page=15")
        );
    }
}
