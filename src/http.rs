use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, info};
use url::Url;

use crate::error::{Error, Result};

/// Applied when the caller does not supply a timeout.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// A single outbound GET. The token, when non-empty, is sent as a bearer
/// credential and is redacted from `Debug` output.
#[derive(Clone, Default)]
pub struct HttpRequestParams {
    pub url: String,
    pub token: String,
    /// Seconds; `None` means [`DEFAULT_HTTP_TIMEOUT_SECS`].
    pub timeout: Option<u64>,
}

impl HttpRequestParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<u64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS))
    }
}

impl fmt::Debug for HttpRequestParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequestParams")
            .field("url", &self.url)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Issues one GET and returns the body of a 2xx response.
///
/// Non-2xx responses become [`Error::Fetch`] carrying the final URL of the
/// request (after redirects). No retries are attempted.
pub async fn http_get(params: &HttpRequestParams) -> Result<Vec<u8>> {
    match Url::parse(&params.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => return Err(Error::UnsupportedScheme(params.url.clone())),
    }

    let client = Client::builder()
        .timeout(params.timeout_duration())
        .build()
        .map_err(|source| Error::Transport {
            url: params.url.clone(),
            source,
        })?;

    let mut request = client.get(&params.url);
    if !params.token.is_empty() {
        request = request.bearer_auth(&params.token);
    }

    debug!(
        url = %params.url,
        authenticated = !params.token.is_empty(),
        timeout_secs = params.timeout_duration().as_secs(),
        "Sending GET request"
    );

    let response = request.send().await.map_err(|source| {
        error!(url = %params.url, error = %source, "GET request failed before a response");
        Error::Transport {
            url: params.url.clone(),
            source,
        }
    })?;

    let status = response.status();
    let final_url = response.url().to_string();
    if !status.is_success() {
        error!(url = %final_url, status = %status, "GET request returned an error status");
        return Err(Error::Fetch {
            url: final_url,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }

    let body = response.bytes().await.map_err(|source| Error::Transport {
        url: final_url.clone(),
        source,
    })?;
    info!(url = %final_url, bytes = body.len(), "GET request succeeded");
    Ok(body.to_vec())
}
