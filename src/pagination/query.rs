//! Ordered query-string handling for pagination links.

use url::form_urlencoded;

/// Query parameter carrying the requested page number.
pub const PAGE_PARAM: &str = "page";

/// Query parameter carrying the requested page size.
pub const PER_PAGE_PARAM: &str = "per_page";

/// The query parameters of an inbound request, in the order they appeared.
///
/// Repeated keys are kept as separate entries so that `tag=a&tag=b`
/// round-trips unchanged into generated links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Parses a raw (still percent-encoded) query string, without the leading `?`.
    pub fn parse(raw: &str) -> Self {
        Self(form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// First value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Builds the URL of `page` for a listing rooted at `base_url`.
///
/// Every parameter of `query` except `page` and `per_page` is carried over in
/// its original order; `page` and `per_page` are appended last. The output is
/// a pure function of its inputs.
pub fn page_url(base_url: &str, query: &QueryParams, page: i64, per_page: i64) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query
        .iter()
        .filter(|(key, _)| *key != PAGE_PARAM && *key != PER_PAGE_PARAM)
    {
        serializer.append_pair(key, value);
    }
    serializer.append_pair(PAGE_PARAM, &page.to_string());
    serializer.append_pair(PER_PAGE_PARAM, &per_page.to_string());

    format!("{}?{}", base_url, serializer.finish())
}
