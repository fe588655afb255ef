//! Client-held session state.
//!
//! The whole session lives in one signed cookie: a URL-safe base64 JSON
//! payload with the logged-in username and any pending one-time notices.
//! The signature only proves the server wrote the cookie; the content is
//! readable by the client.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use tracing::{debug, error};

pub const SESSION_COOKIE: &str = "portal_session";

/// Most notices kept pending at once; older ones are dropped first.
pub const MAX_FLASHES: usize = 5;

/// Derive the 64-byte cookie signing key from the configured secret.
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// A notice shown once on the next rendered page, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<Flash>,
}

impl SessionData {
    /// Read the session from the request cookies. A missing, forged or
    /// undecodable cookie yields an empty session.
    pub fn load(jar: &SignedCookieJar) -> Self {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Self::default();
        };

        let decoded = B64
            .decode(cookie.value())
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice(&bytes).map_err(|e| e.to_string()));

        match decoded {
            Ok(session) => session,
            Err(e) => {
                debug!("discarding unreadable session cookie: {}", e);
                Self::default()
            }
        }
    }

    /// Write the session back into the jar. An empty session removes the
    /// cookie altogether.
    pub fn save(&self, jar: SignedCookieJar) -> SignedCookieJar {
        if self.is_empty() {
            return jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
        }

        let payload = match serde_json::to_vec(self) {
            Ok(payload) => payload,
            Err(e) => {
                error!("failed to encode session: {}", e);
                return jar;
            }
        };

        jar.add(
            Cookie::build((SESSION_COOKIE, B64.encode(payload)))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        )
    }

    /// The authenticated username, if any. An empty name does not count.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }

    /// Queue a notice. A repeat of the newest pending notice is skipped,
    /// and the queue never grows past `MAX_FLASHES`.
    pub fn flash(&mut self, category: &str, message: &str) {
        let flash = Flash {
            category: category.to_string(),
            message: message.to_string(),
        };
        if self.flashes.last() == Some(&flash) {
            return;
        }
        self.flashes.push(flash);
        if self.flashes.len() > MAX_FLASHES {
            let excess = self.flashes.len() - MAX_FLASHES;
            self.flashes.drain(..excess);
        }
    }

    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.flashes)
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.flashes.is_empty()
    }
}
