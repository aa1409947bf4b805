//! `Set-Cookie` construction and `Cookie` header parsing for the admin
//! session cookie.

use axum::http::{header, HeaderMap, HeaderValue};
use std::fmt::Write;

/// Name of the cookie carrying the admin session token.
pub const ADMIN_COOKIE: &str = "admin_token";

/// Build the `Set-Cookie` value for a session cookie.
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!("{name}={value}");
    let _ = write!(cookie, "; Max-Age={max_age_secs}");
    cookie.push_str("; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set the admin session cookie on a response.
pub fn set_admin_cookie(headers: &mut HeaderMap, token: &str, max_age_secs: i64, secure: bool) {
    let cookie = session_cookie(ADMIN_COOKIE, token, max_age_secs, secure);
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
}

/// Expire the admin session cookie.
pub fn clear_admin_cookie(headers: &mut HeaderMap, secure: bool) {
    set_admin_cookie(headers, "", 0, secure);
}

/// Extract a cookie value from request headers.
pub fn get_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name.trim() == cookie_name && !value.trim().is_empty())
                .then(|| value.trim().to_string())
        })
}
