use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use parking_lot::Mutex;
use tracing::warn;

use super::store::SessionStore;
use crate::error::{SessionError, SessionResult};

/// Request-scoped store over the HTTP cookie jar.
///
/// The cookie named after the session key holds base64url(JSON record). Writes are queued as
/// `Set-Cookie` headers for the response and are visible to later reads in the same request.
#[derive(Debug)]
pub struct CookieSessionStore {
    name: String,
    secure: bool,
    current: Mutex<Option<String>>,
    outgoing: Mutex<Vec<HeaderValue>>,
}

/// Browsers commonly drop cookies larger than this (name, value and attributes together).
pub const MAX_COOKIE_BYTES: usize = 4096;

pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for cookie in headers.get_all(COOKIE).iter() {
        let Ok(s) = cookie.to_str() else { continue; };
        for part in s.split(';') {
            let p = part.trim();
            if let Some((k, v)) = p.split_once('=') {
                if k == name { return Some(v.to_string()); }
            }
        }
    }
    None
}

impl CookieSessionStore {
    pub fn new(name: impl Into<String>, secure: bool) -> Self {
        Self { name: name.into(), secure, current: Mutex::new(None), outgoing: Mutex::new(Vec::new()) }
    }

    pub fn from_headers(headers: &HeaderMap, name: &str, secure: bool) -> Self {
        let store = Self::new(name, secure);
        *store.current.lock() = parse_cookie(headers, name);
        store
    }

    fn attrs(&self) -> &'static str {
        if self.secure { "HttpOnly; Secure; SameSite=Strict; Path=/" } else { "HttpOnly; SameSite=Strict; Path=/" }
    }

    fn push(&self, cookie: String) -> SessionResult<()> {
        let hv = HeaderValue::from_str(&cookie).map_err(|e| SessionError::Encoding(e.to_string()))?;
        self.outgoing.lock().push(hv);
        Ok(())
    }

    /// Drain the queued `Set-Cookie` values.
    pub fn take_set_cookies(&self) -> Vec<HeaderValue> {
        std::mem::take(&mut *self.outgoing.lock())
    }

    /// Append the queued `Set-Cookie` values to a response header map.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for v in self.take_set_cookies() {
            headers.append(SET_COOKIE, v);
        }
    }
}

impl SessionStore for CookieSessionStore {
    fn key(&self) -> &str { &self.name }

    fn read_raw(&self) -> SessionResult<Option<String>> {
        let Some(encoded) = self.current.lock().clone() else { return Ok(None); };
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.as_bytes())
            .map_err(|e| SessionError::Encoding(format!("session cookie is not base64url: {}", e)))?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| SessionError::Encoding(format!("session cookie is not utf-8: {}", e)))
    }

    fn write_raw(&self, text: &str) -> SessionResult<()> {
        let encoded = URL_SAFE_NO_PAD.encode(text.as_bytes());
        let cookie = format!("{}={}; {}", self.name, encoded, self.attrs());
        if cookie.len() > MAX_COOKIE_BYTES {
            warn!(
                target: "session",
                key = %self.name,
                bytes = cookie.len(),
                limit = MAX_COOKIE_BYTES,
                "session cookie exceeds browser size limit and may be dropped"
            );
        }
        self.push(cookie)?;
        *self.current.lock() = Some(encoded);
        Ok(())
    }

    fn clear(&self) -> SessionResult<()> {
        self.current.lock().take();
        self.push(format!("{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; {}", self.name, self.attrs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        h
    }

    #[test]
    fn parse_cookie_picks_named_pair() {
        let h = headers_with("theme=dark; user=abc; other=1");
        assert_eq!(parse_cookie(&h, "user").as_deref(), Some("abc"));
        assert_eq!(parse_cookie(&h, "missing"), None);
    }

    #[test]
    fn save_queues_cookie_and_is_visible_to_load() {
        let s = CookieSessionStore::new("user", true);
        let id = Identity::with_role("student").full_name("Jane Doe");
        s.save(&id).unwrap();
        assert_eq!(s.load().into_identity(), Some(id));
        let set = s.take_set_cookies();
        assert_eq!(set.len(), 1);
        let v = set[0].to_str().unwrap();
        assert!(v.starts_with("user="));
        assert!(v.contains("HttpOnly; Secure; SameSite=Strict; Path=/"));
    }

    #[test]
    fn incoming_cookie_round_trips() {
        let id = Identity::with_role("faculty").first_name("Ada");
        let encoded = URL_SAFE_NO_PAD.encode(id.to_json().unwrap());
        let s = CookieSessionStore::from_headers(&headers_with(&format!("user={}", encoded)), "user", false);
        assert_eq!(s.load().into_identity(), Some(id));
        assert!(s.take_set_cookies().is_empty());
    }

    #[test]
    fn undecodable_cookie_is_malformed() {
        let s = CookieSessionStore::from_headers(&headers_with("user=!!!"), "user", false);
        assert!(s.load().is_malformed());
        let not_json = URL_SAFE_NO_PAD.encode("hello");
        let s = CookieSessionStore::from_headers(&headers_with(&format!("user={}", not_json)), "user", false);
        assert!(s.load().is_malformed());
    }

    #[test]
    fn oversized_record_is_still_queued() {
        let s = CookieSessionStore::new("user", true);
        let mut id = Identity::with_role("student");
        id.profile.insert("bio".into(), serde_json::json!("x".repeat(MAX_COOKIE_BYTES)));
        s.save(&id).unwrap();
        let set = s.take_set_cookies();
        assert_eq!(set.len(), 1);
        assert!(set[0].len() > MAX_COOKIE_BYTES);
        assert_eq!(s.load().into_identity(), Some(id));
    }

    #[test]
    fn clear_emits_expired_cookie_and_hides_value() {
        let s = CookieSessionStore::from_headers(&headers_with("user=e30"), "user", false);
        s.clear().unwrap();
        assert!(s.load().is_absent());
        let set = s.take_set_cookies();
        let v = set[0].to_str().unwrap();
        assert!(v.starts_with("user=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(!v.contains("Secure"));
    }
}
