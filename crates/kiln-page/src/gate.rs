//! Login gate for code blocks
//!
//! When the gate is enabled and the visitor carries no auth cookie,
//! every code block receives a click-to-login overlay. Clicking it
//! opens the GitHub OAuth authorize page in a popup window.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// OAuth application client id baked into the login URL
pub const GITHUB_CLIENT_ID: &str = "3d8b7fe111b6c387c261";

/// OAuth scope requested at login
pub const GITHUB_OAUTH_SCOPE: &str = "user:email";

/// Window name passed to `window.open`
pub const LOGIN_WINDOW_NAME: &str = "GitHub Login";

/// Window features passed to `window.open`
pub const LOGIN_WINDOW_FEATURES: &str = "width=800,height=550,top=150,left=300";

const AUTH_COOKIE: &str = "authenticated";

/// Read access to the visitor's cookies
///
/// The gate only ever asks whether a named cookie exists. Tests supply
/// [`StaticCookies`], servers adapt their request type.
pub trait CookieSource {
    /// Value of the named cookie, if present
    fn cookie(&self, name: &str) -> Option<String>;
}

/// A visitor with no cookies at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCookies;

impl CookieSource for NoCookies {
    fn cookie(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Fixed cookie set, for tests and one-shot rendering
#[derive(Debug, Clone, Default)]
pub struct StaticCookies {
    cookies: HashMap<String, String>,
}

impl StaticCookies {
    /// Empty cookie set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }
}

impl CookieSource for StaticCookies {
    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }
}

/// Gate configuration
///
/// Disabled by default. Enabling it requires an explicit `enabled =
/// true` in the site configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatePolicy {
    /// Whether code blocks are gated at all
    pub enabled: bool,
    /// Cookie whose presence marks a logged-in visitor
    pub cookie_name: String,
    /// OAuth client id for the authorize URL
    pub client_id: String,
    /// OAuth scope for the authorize URL
    pub scope: String,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            cookie_name: AUTH_COOKIE.to_owned(),
            client_id: GITHUB_CLIENT_ID.to_owned(),
            scope: GITHUB_OAUTH_SCOPE.to_owned(),
        }
    }
}

impl GatePolicy {
    /// The GitHub OAuth authorize URL opened by the overlay
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!(
            "https://github.com/login/oauth/authorize?client_id={}&scope={}",
            self.client_id, self.scope
        )
    }

    /// Whether this visitor's blocks get overlays
    #[must_use]
    pub fn should_gate(&self, cookies: &dyn CookieSource) -> bool {
        self.enabled && cookies.cookie(&self.cookie_name).is_none()
    }

    /// Overlay markup appended inside a gated code element
    ///
    /// The click handler opens the authorize URL in a popup. Ampersands
    /// in the URL are entity-escaped because the handler lives in an
    /// HTML attribute.
    #[must_use]
    pub fn overlay_html(&self) -> String {
        let url = self.authorize_url().replace('&', "&amp;");
        format!(
            "<div class=\"code-overlay\" onclick=\"window.open('{url}', \
             '{LOGIN_WINDOW_NAME}', '{LOGIN_WINDOW_FEATURES}'); return false;\">\
             <div class=\"login-button\">\
             <i class=\"fa fa-github\" aria-hidden=\"true\"></i> \
             <span>Login with GitHub to view source</span>\
             </div></div>"
        )
    }
}
