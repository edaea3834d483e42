//! Auth configuration and shared handler state.

use std::sync::Arc;

use crate::api::behavior::BehaviorTracker;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Immutable configuration resolved once at process start. Every field has a
/// default so the server runs with no environment at all.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    site_base_url: String,
    session_ttl_seconds: i64,
    live_trading: bool,
    paper_trading: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new(site_base_url: String) -> Self {
        Self {
            site_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            live_trading: false,
            paper_trading: true,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_live_trading(mut self, enabled: bool) -> Self {
        self.live_trading = enabled;
        self
    }

    #[must_use]
    pub fn with_paper_trading(mut self, enabled: bool) -> Self {
        self.paper_trading = enabled;
        self
    }

    pub(crate) fn site_base_url(&self) -> &str {
        &self.site_base_url
    }

    pub(crate) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Cookies are only marked `Secure` when the site is served over HTTPS,
    /// so local dev over plain HTTP keeps working.
    pub(crate) fn session_cookie_secure(&self) -> bool {
        self.site_base_url.starts_with("https://")
    }

    #[must_use]
    pub fn live_trading(&self) -> bool {
        self.live_trading
    }

    #[must_use]
    pub fn paper_trading(&self) -> bool {
        self.paper_trading
    }
}

pub struct AuthState {
    config: AuthConfig,
    tracker: Arc<dyn BehaviorTracker>,
}

impl AuthState {
    pub fn new(config: AuthConfig, tracker: Arc<dyn BehaviorTracker>) -> Self {
        Self { config, tracker }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn tracker(&self) -> &dyn BehaviorTracker {
        self.tracker.as_ref()
    }
}
