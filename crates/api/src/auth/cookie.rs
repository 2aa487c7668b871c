//! The `token` cookie issued alongside the JSON token at login/registration.

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};

/// Cookie name carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

/// Build the `Set-Cookie` value for a freshly issued token.
///
/// The cookie is http-only, scoped to the whole site, and expires together
/// with the token.
pub fn token_cookie(
    token: &str,
    max_age_secs: i64,
    secure: bool,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie =
        format!("{TOKEN_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read the token from the request's `Cookie` headers, if present.
pub fn read_token_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_is_http_only() {
        let value = token_cookie("abc.def.ghi", 3600, false).unwrap();
        let text = value.to_str().unwrap();
        assert!(text.starts_with("token=abc.def.ghi;"));
        assert!(text.contains("HttpOnly"));
        assert!(text.contains("Max-Age=3600"));
        assert!(!text.contains("Secure"));
    }

    #[test]
    fn secure_flag_is_appended() {
        let value = token_cookie("t", 60, true).unwrap();
        assert!(value.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn reads_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=xyz; lang=it"));
        assert_eq!(read_token_cookie(&headers), Some("xyz"));
    }

    #[test]
    fn missing_or_empty_token_cookie_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(read_token_cookie(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("token="));
        assert_eq!(read_token_cookie(&headers), None);
    }
}
