//! `auth_token` cookie helpers.

use axum::http::{header::COOKIE, HeaderMap};

use super::token::TOKEN_TTL;

pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// `Set-Cookie` value carrying a freshly issued token.
pub fn auth_cookie(token: &str, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{AUTH_COOKIE_NAME}={token}; HttpOnly{secure_flag}; SameSite=Lax; Path=/; Max-Age={}",
        TOKEN_TTL.whole_seconds()
    )
}

/// `Set-Cookie` value that expires the auth cookie immediately.
pub fn clear_auth_cookie(secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!("{AUTH_COOKIE_NAME}=; HttpOnly{secure_flag}; SameSite=Lax; Path=/; Max-Age=0")
}

/// Reads the auth cookie from the request's `Cookie` headers.
pub fn read_auth_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|part| {
            let (name, value) = part.split_once('=')?;
            (name.trim() == AUTH_COOKIE_NAME).then(|| value.trim().to_string())
        })
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_attributes() {
        let c = auth_cookie("tok", false);
        assert!(c.starts_with("auth_token=tok;"));
        assert!(c.contains("HttpOnly"));
        assert!(c.contains("SameSite=Lax"));
        assert!(c.contains("Path=/"));
        assert!(c.contains("Max-Age=604800"));
        assert!(!c.contains("Secure"));
        assert!(auth_cookie("tok", true).contains("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let c = clear_auth_cookie(true);
        assert!(c.starts_with("auth_token=;"));
        assert!(c.contains("Max-Age=0"));
        assert!(c.contains("Secure"));
    }

    #[test]
    fn reads_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=abc-123 ; lang=en"),
        );
        assert_eq!(read_auth_cookie(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn empty_or_missing_cookie_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(read_auth_cookie(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("auth_token=; x=1"));
        assert_eq!(read_auth_cookie(&headers), None);
    }
}
