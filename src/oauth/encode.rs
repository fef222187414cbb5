use {crate::oauth::OAuthError, reqwest::Url};

/// Percent-encode a value per RFC 3986.
///
/// Only the unreserved characters (`A-Z`, `a-z`, `0-9`, `-`, `.`, `_`, `~`) pass through; everything else is
/// encoded as `%XX` with uppercase hex digits.
#[inline]
pub fn escape(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Reverse [`escape`].
pub fn unescape(value: &str) -> Result<String, OAuthError> {
    urlencoding::decode(value)
        .map(|v| v.into_owned())
        .map_err(|e| OAuthError::MalformedHeader(format!("invalid percent-encoding in {value:?}: {e}")))
}

/// The base string URI: scheme and authority lowercased, default ports dropped, query and fragment removed.
pub fn normalize_url(url: &Url) -> String {
    let scheme = url.scheme().to_ascii_lowercase();
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

    // Url::port() is None when the port is the scheme's default.
    match url.port() {
        Some(port) => format!("{scheme}://{host}:{port}{}", url.path()),
        None => format!("{scheme}://{host}{}", url.path()),
    }
}
