//! Credential cookie reading and rewriting.
//!
//! The two credential cookies are deliberately not HTTP-only so the
//! gateway and the realtime handshake can read them; the edge only sets
//! `SameSite=Lax` and a path-wide scope.

use http::HeaderMap;

/// Reads a named cookie from the request `Cookie` header.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(http::header::COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Builds a `Set-Cookie` value storing `value` for `max_age_seconds`.
pub fn set(name: &str, value: &str, max_age_seconds: u64) -> String {
    format!("{name}={value}; Path=/; Max-Age={max_age_seconds}; SameSite=Lax")
}

/// Builds a `Set-Cookie` value deleting the cookie.
pub fn clear(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            "a=1; chat_accessToken=tok.en.sig; b=2".parse().expect("header"),
        );
        assert_eq!(
            read(&headers, "chat_accessToken").as_deref(),
            Some("tok.en.sig")
        );
        assert_eq!(read(&headers, "chat_refreshToken"), None);
    }

    #[test]
    fn test_set_and_clear_shapes() {
        assert_eq!(
            set("chat_accessToken", "abc", 900),
            "chat_accessToken=abc; Path=/; Max-Age=900; SameSite=Lax"
        );
        assert_eq!(
            clear("chat_refreshToken"),
            "chat_refreshToken=; Path=/; Max-Age=0; SameSite=Lax"
        );
    }
}
