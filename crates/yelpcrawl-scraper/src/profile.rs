//! Request headers and client identity.
//!
//! Every request carries the header set of a desktop Chrome navigation. The
//! client hints (`sec-ch-ua`) must agree with the user agent's Chrome major
//! version, so an identity is only accepted when that version can be read.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

/// Identities tried before rotation gives up.
pub const MAX_IDENTITY_ATTEMPTS: usize = 11;

/// Desktop Chrome on Windows user agents rotated across runs.
pub const CHROME_WINDOWS_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
];

static CHROME_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Chrome/(\d+)\.").expect("valid regex"));

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("no user agent with a readable Chrome version after {attempts} attempts")]
    NoPlausibleIdentity { attempts: usize },

    #[error("user agent must not be empty")]
    EmptyUserAgent,

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Supplies the headers sent with every request.
pub trait RequestProfile: Send + Sync {
    fn headers(&self) -> HeaderMap;

    fn user_agent(&self) -> &str;
}

/// Browser-like header set around one chosen user agent.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    user_agent: String,
    chrome_version: Option<String>,
    headers: HeaderMap,
}

impl BrowserProfile {
    /// Picks a random Chrome identity from [`CHROME_WINDOWS_USER_AGENTS`].
    ///
    /// # Errors
    ///
    /// See [`Self::rotate_with`].
    pub fn rotate(origin: &str) -> Result<Self, ProfileError> {
        Self::rotate_with(&mut rand::rng(), CHROME_WINDOWS_USER_AGENTS, origin)
    }

    /// Draws from `pool` until an agent with a readable Chrome version turns
    /// up, at most [`MAX_IDENTITY_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::NoPlausibleIdentity`] if every draw lacks a
    /// Chrome version (or `pool` is empty).
    pub fn rotate_with<R: Rng>(
        rng: &mut R,
        pool: &[&str],
        origin: &str,
    ) -> Result<Self, ProfileError> {
        if !pool.is_empty() {
            for _ in 0..MAX_IDENTITY_ATTEMPTS {
                let candidate = pool[rng.random_range(0..pool.len())];
                if let Some(version) = chrome_major_version(candidate) {
                    let version = version.to_owned();
                    return Self::build(candidate.to_owned(), Some(version), origin);
                }
                tracing::debug!(user_agent = candidate, "user agent has no Chrome version; drawing again");
            }
        }
        Err(ProfileError::NoPlausibleIdentity {
            attempts: MAX_IDENTITY_ATTEMPTS,
        })
    }

    /// Uses a fixed user agent. Client hints are only sent when it is a
    /// Chrome agent.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::EmptyUserAgent`] for a blank agent and
    /// [`ProfileError::InvalidHeader`] if it cannot be sent as a header.
    pub fn with_user_agent(user_agent: &str, origin: &str) -> Result<Self, ProfileError> {
        let user_agent = user_agent.trim();
        if user_agent.is_empty() {
            return Err(ProfileError::EmptyUserAgent);
        }
        let version = chrome_major_version(user_agent).map(str::to_owned);
        Self::build(user_agent.to_owned(), version, origin)
    }

    #[must_use]
    pub fn chrome_version(&self) -> Option<&str> {
        self.chrome_version.as_deref()
    }

    fn build(
        user_agent: String,
        chrome_version: Option<String>,
        origin: &str,
    ) -> Result<Self, ProfileError> {
        let referer = format!("{}/", origin.trim_end_matches('/'));
        let mut pairs: Vec<(&'static str, String)> = vec![
            (
                "accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9".to_owned(),
            ),
            ("accept-language", "en-US,en;q=0.9".to_owned()),
            ("cache-control", "max-age=0".to_owned()),
            ("referer", referer),
            ("sec-fetch-dest", "document".to_owned()),
            ("sec-fetch-mode", "navigate".to_owned()),
            ("sec-fetch-site", "same-origin".to_owned()),
            ("sec-fetch-user", "?1".to_owned()),
            ("upgrade-insecure-requests", "1".to_owned()),
            ("user-agent", user_agent.clone()),
        ];
        if let Some(version) = &chrome_version {
            pairs.push((
                "sec-ch-ua",
                format!(
                    r#""Not_A Brand";v="99", "Google Chrome";v="{version}", "Chromium";v="{version}""#
                ),
            ));
            pairs.push(("sec-ch-ua-mobile", "?0".to_owned()));
            pairs.push(("sec-ch-ua-platform", r#""Windows""#.to_owned()));
        }

        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            let value = HeaderValue::from_str(&value).map_err(|e| ProfileError::InvalidHeader {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;
            headers.insert(HeaderName::from_static(name), value);
        }

        Ok(Self {
            user_agent,
            chrome_version,
            headers,
        })
    }
}

impl RequestProfile for BrowserProfile {
    fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

fn chrome_major_version(user_agent: &str) -> Option<&str> {
    CHROME_VERSION_RE
        .captures(user_agent)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}
