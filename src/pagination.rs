use axum::http::header::{HeaderMap, HeaderValue};

use crate::models::SearchModel;

pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";
pub const CONTENT_RANGE_HEADER: &str = "Content-Range";

/// Sanitize resource name by removing control characters for HTTP headers
fn sanitize_resource_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

/// Headers reporting the total of a finished search.
///
/// `X-Total-Count` carries `search.total_count`, and `Content-Range` the
/// window the page covers: `<resource> <start>-<end>/<total>`, or
/// `<resource> */<total>` when the page is empty. Nothing is added before the
/// search has run.
#[must_use]
pub fn total_count_headers(search: &SearchModel, resource_name: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let Some(total_count) = search.total_count else {
        return headers;
    };

    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(total_count));

    let start = search.offset.unwrap_or(0);
    let last = total_count.saturating_sub(1);
    let range = if start >= total_count || search.limit == Some(0) {
        format!("*/{total_count}")
    } else {
        let end = search
            .limit
            .map_or(last, |limit| start.saturating_add(limit).saturating_sub(1).min(last));
        format!("{start}-{end}/{total_count}")
    };

    // Sanitize resource name to prevent header injection
    let safe_name = sanitize_resource_name(resource_name);
    let value = HeaderValue::from_str(&format!("{safe_name} {range}"))
        .or_else(|_| HeaderValue::from_str(&format!("items {range}")));
    if let Ok(value) = value {
        headers.insert(CONTENT_RANGE_HEADER, value);
    }

    headers
}
