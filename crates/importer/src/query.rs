//! Query-string construction for provider endpoints.

use urlencoding::encode;

/// Builds a query string from named parameters, dropping unset ones.
///
/// Keys and values are percent-encoded and joined with `&` in the order
/// given.
///
/// # Examples
///
/// ```
/// use importer::query::build_query;
///
/// let query = build_query([
///     ("tour", Some("pga")),
///     ("event", None),
///     ("file_format", Some("json")),
/// ]);
/// assert_eq!(query, "tour=pga&file_format=json");
/// ```
pub fn build_query<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: AsRef<str>,
    V: ToString,
{
    params
        .into_iter()
        .filter_map(|(key, value)| {
            value.map(|v| format!("{}={}", encode(key.as_ref()), encode(&v.to_string())))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Joins a base URL, path and query string.
pub fn endpoint_url(base_url: &str, path: &str, query: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if query.is_empty() {
        format!("{}/{}", base, path)
    } else {
        format!("{}/{}?{}", base, path, query)
    }
}

/// Replaces the value of any `key` query parameter, for logging.
pub fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("key=") {
                "key=REDACTED"
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}
