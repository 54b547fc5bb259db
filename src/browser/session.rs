//! The persisted login session.
//!
//! The file holds the site cookies captured after an interactive login and
//! uses the same `cookies` layout as browser storage-state exports, so either
//! can be fed back in. Unknown keys are ignored.

use std::path::Path;

use eyre::{Result, WrapErr, bail};
use fantoccini::cookies::Cookie;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    /// Unix seconds, `-1` for session cookies.
    #[serde(default = "session_expiry")]
    pub expires: f64,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub same_site: Option<String>,
}

fn session_expiry() -> f64 {
    -1.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub cookies: Vec<SessionCookie>,
}

impl SessionState {
    /// Reads the session file; a missing, unreadable or empty session is an
    /// error since there is no way to log in unattended.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!(
                "session file {} not found; run the `login` command first",
                path.display()
            );
        }

        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read session file {}", path.display()))?;
        let state: SessionState = serde_json::from_str(&raw)
            .wrap_err_with(|| format!("session file {} is not valid", path.display()))?;

        if state.cookies.is_empty() {
            bail!("session file {} holds no cookies", path.display());
        }

        debug!("loaded {} session cookies", state.cookies.len());
        Ok(state)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .wrap_err_with(|| format!("failed to write session file {}", path.display()))?;
        info!("login session saved to {}", path.display());
        Ok(())
    }

    pub fn from_cookies(cookies: &[Cookie<'static>]) -> Self {
        let cookies = cookies
            .iter()
            .map(|cookie| SessionCookie {
                name: cookie.name().to_string(),
                value: cookie.value().to_string(),
                domain: cookie.domain().map(str::to_string),
                path: cookie.path().map(str::to_string),
                expires: cookie
                    .expires_datetime()
                    .map(|at| at.unix_timestamp() as f64)
                    .unwrap_or_else(session_expiry),
                http_only: cookie.http_only().unwrap_or(false),
                secure: cookie.secure().unwrap_or(false),
                same_site: cookie.same_site().map(|s| s.to_string()),
            })
            .collect();

        Self { cookies }
    }

    /// Cookies ready to hand to the WebDriver session. Expiry is left to the
    /// server; a restored cookie lives as long as the browser session.
    pub fn to_cookies(&self) -> Vec<Cookie<'static>> {
        self.cookies
            .iter()
            .map(|stored| {
                let mut cookie = Cookie::new(stored.name.clone(), stored.value.clone());
                if let Some(domain) = &stored.domain {
                    cookie.set_domain(domain.clone());
                }
                if let Some(path) = &stored.path {
                    cookie.set_path(path.clone());
                }
                cookie.set_secure(stored.secure);
                cookie.set_http_only(stored.http_only);
                cookie
            })
            .collect()
    }
}
