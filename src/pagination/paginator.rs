use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::query::{QueryParams, page_url};

/// Page served when the request does not name one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the request does not name one.
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Upper bound accepted for `per_page` at the HTTP boundary.
pub const MAX_PER_PAGE: i64 = 100;

/// Numbered links rendered on each side of the current page.
pub const LINK_WINDOW: i64 = 2;

pub const PREVIOUS_LABEL: &str = "previous";
pub const NEXT_LABEL: &str = "next";

/// Errors raised while assembling a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Invalid pagination argument '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },
}

/// One navigation entry of a page envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageLink {
    /// Target URL; `null` when the link points outside the result set
    #[schema(example = "http://localhost:3000/api/companies?page=2&per_page=15")]
    pub url: Option<String>,
    /// `previous`, `next`, or the page number
    #[schema(example = "2")]
    pub label: String,
    /// Whether this entry is the page being served
    pub active: bool,
}

/// A single page of a listing plus everything needed to navigate it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    #[schema(example = 2)]
    pub current_page: i64,
    /// 1-based index of the first item of `data` in the full set, 0 when empty
    #[schema(example = 16)]
    pub from: i64,
    /// 0 when the result set is empty
    #[schema(example = 3)]
    pub last_page: i64,
    /// Request URL without its query string
    #[schema(example = "http://localhost:3000/api/companies")]
    pub path: String,
    #[schema(example = 15)]
    pub per_page: i64,
    /// 1-based index of the last item of `data` in the full set, 0 when empty
    #[schema(example = 30)]
    pub to: i64,
    #[schema(example = 42)]
    pub total: i64,
    pub first_page_url: String,
    pub last_page_url: String,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
    pub links: Vec<PageLink>,
}

impl<T> PageResult<T> {
    /// Converts every item while keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> PageResult<U>
    where
        F: FnMut(T) -> U,
    {
        PageResult {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            from: self.from,
            last_page: self.last_page,
            path: self.path,
            per_page: self.per_page,
            to: self.to,
            total: self.total,
            first_page_url: self.first_page_url,
            last_page_url: self.last_page_url,
            next_page_url: self.next_page_url,
            prev_page_url: self.prev_page_url,
            links: self.links,
        }
    }
}

/// Wraps an already-sliced page of `items` into a [`PageResult`].
///
/// `total` is the size of the whole result set, `page` is 1-based and
/// `base_url` is the scheme, host and path of the listing endpoint. Query
/// parameters other than `page` and `per_page` are carried into every link.
///
/// # Errors
///
/// [`PaginationError::InvalidArgument`] when `page` or `per_page` is below 1
/// or `total` is negative.
pub fn paginate<T>(
    items: Vec<T>,
    total: i64,
    page: i64,
    per_page: i64,
    base_url: &str,
    query: &QueryParams,
) -> Result<PageResult<T>, PaginationError> {
    if page < 1 {
        return Err(PaginationError::InvalidArgument {
            argument: "page",
            reason: format!("must be at least 1, got {}", page),
        });
    }
    if per_page < 1 {
        return Err(PaginationError::InvalidArgument {
            argument: "per_page",
            reason: format!("must be at least 1, got {}", per_page),
        });
    }
    if total < 0 {
        return Err(PaginationError::InvalidArgument {
            argument: "total",
            reason: format!("must not be negative, got {}", total),
        });
    }

    let last_page = total / per_page + i64::from(total % per_page != 0);

    // Pages past the end hold no items, so they report an empty slice.
    let (from, to) = if total == 0 || page > last_page {
        (0, 0)
    } else {
        let from = (page - 1) * per_page + 1;
        (from, total.min(from.saturating_add(per_page - 1)))
    };

    let url_for = |target: i64| page_url(base_url, query, target, per_page);

    let next_page_url = (page < last_page).then(|| url_for(page + 1));
    let prev_page_url = (page > 1).then(|| url_for(page - 1));

    let window_start = (page - LINK_WINDOW).max(1);
    let window_end = page.saturating_add(LINK_WINDOW).min(last_page);

    let mut links = Vec::with_capacity((LINK_WINDOW * 2 + 3) as usize);
    links.push(PageLink {
        url: prev_page_url.clone(),
        label: PREVIOUS_LABEL.to_string(),
        active: false,
    });
    for number in window_start..=window_end {
        links.push(PageLink {
            url: Some(url_for(number)),
            label: number.to_string(),
            active: number == page,
        });
    }
    links.push(PageLink {
        url: next_page_url.clone(),
        label: NEXT_LABEL.to_string(),
        active: false,
    });

    Ok(PageResult {
        data: items,
        current_page: page,
        from,
        last_page,
        path: base_url.to_string(),
        per_page,
        to,
        total,
        first_page_url: url_for(1),
        last_page_url: url_for(last_page.max(1)),
        next_page_url,
        prev_page_url,
        links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "http://localhost:3000/api/job-posts";

    fn page_of(total: i64, page: i64, per_page: i64) -> PageResult<i64> {
        let start = (page - 1) * per_page;
        let items: Vec<i64> = (start..total.min(start + per_page)).collect();
        paginate(items, total, page, per_page, BASE, &QueryParams::default()).unwrap()
    }

    fn numbered_labels(result: &PageResult<i64>) -> Vec<String> {
        result.links[1..result.links.len() - 1]
            .iter()
            .map(|link| link.label.clone())
            .collect()
    }

    #[test]
    fn test_middle_page() {
        let result = page_of(42, 2, 15);

        assert_eq!(result.from, 16);
        assert_eq!(result.to, 30);
        assert_eq!(result.last_page, 3);
        assert_eq!(result.data.len(), 15);
        assert_eq!(
            result.next_page_url.as_deref(),
            Some("http://localhost:3000/api/job-posts?page=3&per_page=15")
        );
        assert_eq!(
            result.prev_page_url.as_deref(),
            Some("http://localhost:3000/api/job-posts?page=1&per_page=15")
        );
        assert_eq!(
            result.first_page_url,
            "http://localhost:3000/api/job-posts?page=1&per_page=15"
        );
        assert_eq!(
            result.last_page_url,
            "http://localhost:3000/api/job-posts?page=3&per_page=15"
        );
        assert_eq!(result.path, BASE);
    }

    #[test]
    fn test_empty_result_set() {
        let result = page_of(0, 1, 15);

        assert_eq!(result.from, 0);
        assert_eq!(result.to, 0);
        assert_eq!(result.last_page, 0);
        assert!(result.next_page_url.is_none());
        assert!(result.prev_page_url.is_none());
        assert_eq!(
            result.last_page_url,
            "http://localhost:3000/api/job-posts?page=1&per_page=15"
        );
        // Only the previous/next entries remain.
        assert_eq!(result.links.len(), 2);
        assert!(result.links.iter().all(|link| link.url.is_none()));
    }

    #[test]
    fn test_single_page() {
        let result = page_of(5, 1, 15);

        assert_eq!(result.from, 1);
        assert_eq!(result.to, 5);
        assert_eq!(result.last_page, 1);
        assert!(result.next_page_url.is_none());
        assert!(result.prev_page_url.is_none());
        assert_eq!(numbered_labels(&result), vec!["1"]);
        assert!(result.links[1].active);
    }

    #[test]
    fn test_exact_multiple_of_per_page() {
        let result = page_of(30, 2, 15);
        assert_eq!(result.last_page, 2);
        assert_eq!(result.from, 16);
        assert_eq!(result.to, 30);
        assert!(result.next_page_url.is_none());
    }

    #[test]
    fn test_window_clipped_at_start() {
        let result = page_of(150, 1, 15);
        assert_eq!(result.last_page, 10);
        assert_eq!(numbered_labels(&result), vec!["1", "2", "3"]);
        assert_eq!(result.links.len(), 5);
        assert_eq!(result.links[0].label, PREVIOUS_LABEL);
        assert!(result.links[0].url.is_none());
        assert_eq!(result.links[4].label, NEXT_LABEL);
        assert!(result.links[4].url.is_some());
    }

    #[test]
    fn test_window_clipped_at_end() {
        let result = page_of(150, 10, 15);
        assert_eq!(numbered_labels(&result), vec!["8", "9", "10"]);
        assert!(result.links.last().unwrap().url.is_none());
    }

    #[test]
    fn test_window_centered() {
        let result = page_of(150, 5, 15);
        assert_eq!(numbered_labels(&result), vec!["3", "4", "5", "6", "7"]);
        assert_eq!(result.links.len(), 7);
        let active: Vec<_> = result.links.iter().filter(|l| l.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "5");
    }

    #[test]
    fn test_page_past_the_end() {
        let result = paginate(Vec::<i64>::new(), 20, 5, 15, BASE, &QueryParams::default()).unwrap();
        assert_eq!(result.last_page, 2);
        assert_eq!(result.from, 0);
        assert_eq!(result.to, 0);
        assert!(result.next_page_url.is_none());
        assert_eq!(
            result.prev_page_url.as_deref(),
            Some("http://localhost:3000/api/job-posts?page=4&per_page=15")
        );
        // The window [3, 2] is empty.
        assert_eq!(result.links.len(), 2);
    }

    #[test]
    fn test_filters_are_carried_into_links() {
        let query = QueryParams::parse("search=rust&page=2&per_page=5");
        let result = paginate(vec![1, 2, 3, 4, 5], 12, 2, 5, BASE, &query).unwrap();

        assert_eq!(
            result.next_page_url.as_deref(),
            Some("http://localhost:3000/api/job-posts?search=rust&page=3&per_page=5")
        );
        for link in result.links.iter().filter_map(|l| l.url.as_deref()) {
            assert!(link.contains("search=rust&page="));
            assert_eq!(link.matches("page=").count(), 2); // page= and per_page=
        }
    }

    #[test]
    fn test_invalid_arguments() {
        let query = QueryParams::default();

        let err = paginate(Vec::<i64>::new(), 10, 0, 15, BASE, &query).unwrap_err();
        assert!(matches!(err, PaginationError::InvalidArgument { argument: "page", .. }));

        let err = paginate(Vec::<i64>::new(), 10, 1, 0, BASE, &query).unwrap_err();
        assert!(matches!(err, PaginationError::InvalidArgument { argument: "per_page", .. }));

        let err = paginate(Vec::<i64>::new(), -1, 1, 15, BASE, &query).unwrap_err();
        assert!(matches!(err, PaginationError::InvalidArgument { argument: "total", .. }));
    }

    #[test]
    fn test_serialized_shape() {
        let result = page_of(42, 2, 15);
        let json = serde_json::to_value(&result).unwrap();
        let object = json.as_object().unwrap();

        for key in [
            "data",
            "current_page",
            "from",
            "last_page",
            "path",
            "per_page",
            "to",
            "total",
            "first_page_url",
            "last_page_url",
            "next_page_url",
            "prev_page_url",
            "links",
        ] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(object.len(), 13);
        assert_eq!(json["links"][0]["label"], "previous");
        assert_eq!(json["links"][0]["active"], false);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let result = page_of(42, 3, 15).map(|n| n * 2);
        assert_eq!(result.data.first(), Some(&60));
        assert_eq!(result.from, 31);
        assert_eq!(result.to, 42);
        assert_eq!(result.data.len(), 12);
    }

    proptest! {
        #[test]
        fn prop_slice_bounds(total in 0i64..5_000, per_page in 1i64..200, page_seed in 0i64..1_000) {
            let last = total / per_page + i64::from(total % per_page != 0);
            let page = if last == 0 { 1 } else { page_seed % last + 1 };
            let result = page_of(total, page, per_page);

            prop_assert_eq!(result.last_page, last);
            prop_assert!(result.data.len() as i64 <= per_page);
            if total > 0 {
                prop_assert!(1 <= result.from);
                prop_assert!(result.from <= result.to);
                prop_assert!(result.to <= total);
                prop_assert_eq!(result.to - result.from + 1, result.data.len() as i64);
            } else {
                prop_assert_eq!((result.from, result.to), (0, 0));
            }
        }

        #[test]
        fn prop_links_follow_window(total in 1i64..5_000, per_page in 1i64..50, page_seed in 0i64..1_000) {
            let last = total / per_page + i64::from(total % per_page != 0);
            let page = page_seed % last + 1;
            let result = page_of(total, page, per_page);

            let expected = (page + LINK_WINDOW).min(last) - (page - LINK_WINDOW).max(1) + 1;
            prop_assert_eq!(result.links.len() as i64, expected + 2);
            prop_assert!(result.links.len() as i64 <= (2 * LINK_WINDOW + 1).min(last) + 2);
            prop_assert_eq!(result.links.iter().filter(|l| l.active).count(), 1);
            prop_assert_eq!(result.next_page_url.is_some(), page < last);
            prop_assert_eq!(result.prev_page_url.is_some(), page > 1);
        }

        #[test]
        fn prop_urls_are_deterministic(search in "[a-z &=%]{0,12}", total in 0i64..500, per_page in 1i64..40) {
            let query = QueryParams::from_pairs([("search", search.as_str())]);
            let first = paginate(Vec::<i64>::new(), total, 1, per_page, BASE, &query).unwrap();
            let second = paginate(Vec::<i64>::new(), total, 1, per_page, BASE, &query).unwrap();

            prop_assert_eq!(&first.first_page_url, &second.first_page_url);
            prop_assert_eq!(&first.last_page_url, &second.last_page_url);
            prop_assert_eq!(&first.links, &second.links);
        }
    }
}
