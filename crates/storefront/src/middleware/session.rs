//! Cookie-held sessions.
//!
//! The whole session record (cart and flash queue) travels in a single
//! private cookie, encrypted and authenticated with a key derived from
//! `STOREFRONT_SESSION_SECRET`. The server keeps nothing between requests:
//! each request gets a [`CookieStore`] holding at most the record opened
//! from its cookie, and whatever the handlers leave there is sealed back
//! into `Set-Cookie`. Any instance configured with the same secret can
//! serve any visitor.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::Response,
};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use tokio::sync::Mutex;
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::cookie::{Cookie, CookieJar, Key, SameSite};
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tower_sessions::{Expiry, Session};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "threadline_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Browsers drop cookies larger than this.
const MAX_COOKIE_BYTES: usize = 4096;

/// Key and flags used to open and seal session cookies.
#[derive(Clone)]
pub struct SessionCookies {
    key: Key,
    secure: bool,
}

impl SessionCookies {
    /// Build from the storefront configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        Self::from_secret(&config.session_secret, config.secure_cookies)
    }

    /// Build from raw key material.
    #[must_use]
    pub fn from_secret(secret: &SecretString, secure: bool) -> Self {
        Self {
            key: cookie_key(secret),
            secure,
        }
    }

    const fn expiry() -> Expiry {
        Expiry::OnInactivity(Duration::seconds(SESSION_EXPIRY_SECONDS))
    }

    /// Decrypt and decode the record in `jar`.
    ///
    /// Missing, tampered, undecodable and expired cookies all yield `None`.
    fn open(&self, jar: &CookieJar) -> Option<Record> {
        let cookie = jar.private(&self.key).get(SESSION_COOKIE_NAME)?;

        match serde_json::from_str::<Record>(cookie.value()) {
            Ok(record) if record.expiry_date > OffsetDateTime::now_utc() => Some(record),
            Ok(_) => {
                tracing::debug!("Session cookie expired");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session cookie did not decode");
                None
            }
        }
    }

    /// Encrypt `record` into a `Set-Cookie` value.
    fn seal(&self, record: &Record) -> Option<HeaderValue> {
        let value = serde_json::to_string(record)
            .map_err(|e| tracing::error!(error = %e, "Failed to encode session"))
            .ok()?;

        let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::seconds(SESSION_EXPIRY_SECONDS))
            .build();

        let mut jar = CookieJar::new();
        jar.private_mut(&self.key).add(cookie);
        let sealed = jar.get(SESSION_COOKIE_NAME)?.to_string();

        if sealed.len() > MAX_COOKIE_BYTES {
            tracing::warn!(bytes = sealed.len(), "Session cookie exceeds browser limit");
        }

        HeaderValue::from_str(&sealed).ok()
    }

    /// `Set-Cookie` value that deletes the session cookie.
    fn removal() -> Option<HeaderValue> {
        let mut cookie = Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build();
        cookie.make_removal();
        HeaderValue::from_str(&cookie.to_string()).ok()
    }
}

/// Per-request session store holding the one record carried by the cookie.
#[derive(Debug, Default)]
pub struct CookieStore {
    record: Mutex<Option<Record>>,
}

impl CookieStore {
    /// Store primed with the record opened from the request cookie.
    #[must_use]
    pub fn new(record: Option<Record>) -> Self {
        Self {
            record: Mutex::new(record),
        }
    }

    /// Remove and return the stored record.
    pub async fn take(&self) -> Option<Record> {
        self.record.lock().await.take()
    }
}

#[async_trait]
impl SessionStore for CookieStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        self.save(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        *self.record.lock().await = Some(record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .record
            .lock()
            .await
            .as_ref()
            .filter(|r| r.id == *session_id && r.expiry_date > OffsetDateTime::now_utc())
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let mut slot = self.record.lock().await;
        if slot.as_ref().is_some_and(|r| r.id == *session_id) {
            *slot = None;
        }
        Ok(())
    }
}

/// Middleware that opens the session cookie, exposes it as a [`Session`]
/// extension, and seals any changes back into the response.
///
/// Nothing is written for untouched sessions or server errors. A session
/// emptied by the handler clears the cookie.
pub async fn cookie_session_middleware(
    State(cookies): State<SessionCookies>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = request_jar(request.headers());
    let presented = jar.get(SESSION_COOKIE_NAME).is_some();
    let record = cookies.open(&jar);

    let store = Arc::new(CookieStore::new(record.clone()));
    let session = Session::new(
        record.map(|r| r.id),
        Arc::clone(&store),
        Some(SessionCookies::expiry()),
    );
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if !session.is_modified() || response.status().is_server_error() {
        return response;
    }

    if let Err(e) = session.save().await {
        tracing::error!(error = %e, "Failed to save session");
        return response;
    }

    let header = match store.take().await {
        Some(record) if !record.data.is_empty() => cookies.seal(&record),
        _ if presented => SessionCookies::removal(),
        _ => None,
    };
    if let Some(value) = header {
        response.headers_mut().append(SET_COOKIE, value);
    }

    response
}

/// Collect the request's cookies without verifying them.
fn request_jar(headers: &HeaderMap) -> CookieJar {
    let mut jar = CookieJar::new();
    for header in headers.get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse(header).flatten() {
            jar.add_original(cookie.into_owned());
        }
    }
    jar
}

/// Derive the 64-byte cookie key from the configured secret.
fn cookie_key(secret: &SecretString) -> Key {
    let digest = Sha512::digest(secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}
