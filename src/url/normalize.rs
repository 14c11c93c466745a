use crate::UrlError;
use url::Url;

/// Tracking query parameters removed during normalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a URL into the identity form used by the frontier and visited set
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an http or https scheme and a host
/// 3. Host lowercasing, default-port removal and dot-segment removal are
///    applied by the parser; an empty path becomes `/`
/// 4. Remove fragment (everything after #)
/// 5. Remove tracking query parameters (`utm_*`, `fbclid`, `gclid`, `mc_eid`);
///    queries without tracking parameters keep their original bytes
/// 6. Remove empty query string (trailing ?)
///
/// # Examples
///
/// ```
/// use sitesift::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.COM:443/docs/./intro#setup").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/intro");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    if let Some(query) = url.query() {
        if query.is_empty() {
            url.set_query(None);
        } else {
            normalize_query(&mut url);
        }
    }

    Ok(url)
}

/// Resolves an href found on a page to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - empty and fragment-only hrefs (same page anchors)
/// - javascript:, mailto:, tel: and data: links
/// - anything that does not normalize to an http(s) URL
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}

/// Filters out tracking parameters; leaves clean queries as-is
fn normalize_query(url: &mut Url) {
    let original: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let kept: Vec<(String, String)> = original
        .iter()
        .filter(|(key, _)| !is_tracking_param(key))
        .cloned()
        .collect();

    if kept.len() == original.len() {
        return;
    }

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
