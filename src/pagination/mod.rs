//! Offset pagination with self-describing navigation links.
//!
//! Repositories hand back one slice of a result set together with the total
//! row count. [`paginate`] wraps that slice in a [`PageResult`] carrying the
//! slice bounds, the first/last/next/prev page URLs, and a bounded window of
//! numbered page links built from the inbound request URL.
//!
//! Non-pagination query parameters (such as `search`) survive into every
//! generated link, so a client can follow `next_page_url` without rebuilding
//! its filters.

mod paginator;
mod query;

pub use paginator::{
    DEFAULT_PAGE, DEFAULT_PER_PAGE, LINK_WINDOW, MAX_PER_PAGE, NEXT_LABEL, PREVIOUS_LABEL,
    PageLink, PageResult, PaginationError, paginate,
};
pub use query::{PAGE_PARAM, PER_PAGE_PARAM, QueryParams, page_url};
