//! Browser session reuse.
//!
//! The archiver does not log in. It reuses the `FANBOXSESSID` cookie of a
//! browser that is already logged in, establishes the remaining cookies by
//! visiting the creator page once, and snapshots the cookie header as an
//! immutable [`SessionToken`] for the rest of the run.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{header, Client};
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

/// Cookie domain the session cookies are scoped to.
const COOKIE_ORIGIN: &str = "https://fanbox.cc/";

/// Session cookie name used by the platform.
const SESSION_COOKIE: &str = "FANBOXSESSID";

/// Cookie header snapshot, read once per run.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(cookie_header: impl Into<String>) -> Self {
        Self(cookie_header.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Never print cookie values
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} bytes>)", self.0.len())
    }
}

/// Authenticated same-origin JSON access.
#[async_trait]
pub trait Session: Send + Sync {
    /// Fetch and decode a JSON document. Any failure yields `None`.
    async fn fetch_json(&self, url: &str) -> Option<Value>;

    /// Cookie header to attach to asset downloads.
    fn token(&self) -> &SessionToken;
}

/// Session backed by a cookie jar seeded from the browser.
pub struct CookieSession {
    client: Client,
    origin: String,
    token: SessionToken,
}

impl CookieSession {
    /// Visit the creator page and snapshot the resulting cookies.
    pub async fn establish(config: &Config, creator_id: &str) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let cookie_url = Url::parse(COOKIE_ORIGIN)?;

        if let Some(session_id) = &config.session.session_id {
            jar.add_cookie_str(
                &format!("{}={}; Domain=.fanbox.cc; Path=/", SESSION_COOKIE, session_id.trim()),
                &cookie_url,
            );
        } else {
            tracing::warn!("No session id configured; only public posts will have a body");
        }

        let client = Client::builder()
            .user_agent(&config.session.user_agent)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        let origin = format!("https://{}.fanbox.cc", creator_id);

        // The landing page sets the remaining cookies; failure is not fatal.
        match client.get(&origin).send().await {
            Ok(response) => tracing::debug!("Navigated to {}: {}", origin, response.status()),
            Err(e) => tracing::warn!("Failed to open {}: {}", origin, e),
        }

        let token = jar
            .cookies(&cookie_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .map(SessionToken::new)
            .unwrap_or_default();

        tracing::debug!("Session established: {:?}", token);

        Ok(Self {
            client,
            origin,
            token,
        })
    }

    async fn try_fetch_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header(header::ORIGIN, &self.origin)
            .header(header::REFERER, format!("{}/", self.origin))
            .header(header::ACCEPT, "application/json, text/plain, */*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("HTTP {} for {}", status, url)));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl Session for CookieSession {
    async fn fetch_json(&self, url: &str) -> Option<Value> {
        tracing::debug!("GET {}", url);
        match self.try_fetch_json(url).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Request failed: {}", e);
                None
            }
        }
    }

    fn token(&self) -> &SessionToken {
        &self.token
    }
}
