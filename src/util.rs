//! Utility functions for general-purpose use across the application.

/// Build the public short URL for a code.
///
/// # Examples
///
/// ```
/// use linkforge::util::short_url;
///
/// assert_eq!(short_url("http://localhost:3000/", "4ru9sT"), "http://localhost:3000/4ru9sT");
/// ```
pub fn short_url(base_url: &str, short_code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), short_code)
}

/// Whether `url` uses a scheme a browser can be redirected to.
pub fn is_web_url(url: &str) -> bool {
    ::url::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
        .unwrap_or(false)
}
