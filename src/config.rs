use std::fmt;

use tracing::{debug, info};

use crate::http::{HttpRequestParams, DEFAULT_HTTP_TIMEOUT_SECS};

/// Environment variable holding the provider access token.
pub const TOKEN_ENV: &str = "DEVFILE_GIT_TOKEN";
/// Environment variable overriding the HTTP timeout, in seconds.
pub const TIMEOUT_ENV: &str = "DEVFILE_HTTP_TIMEOUT";

/// Settings shared by every resolution request of a process.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    pub http_timeout_secs: Option<u64>,
    pub token: Option<String>,
}

impl ResolverConfig {
    /// Request parameters for `url` carrying the configured token and timeout.
    pub fn request(&self, url: impl Into<String>) -> HttpRequestParams {
        HttpRequestParams::new(url)
            .with_token(self.token.clone().unwrap_or_default())
            .with_timeout(self.http_timeout_secs)
    }

    pub fn trace_loaded(&self) {
        info!(
            http_timeout_secs = self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            token_configured = self.token.is_some(),
            "Loaded ResolverConfig"
        );
        debug!(?self, "ResolverConfig loaded (full debug)");
    }
}

impl fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
