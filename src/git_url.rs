//! Repository coordinates resolved from a provider URL.
//!
//! A [`GitUrl`] is built once per resolution request by [`GitUrl::parse`] and
//! is immutable afterwards, with one exception: the access token, which can
//! only be stored through [`GitUrl::set_token`] after the provider accepted it.
//! The token is never serialized, printed by `Debug`, or exposed by a getter.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::http::{http_get, HttpRequestParams};
use crate::provider::{provider_for_host, GitProvider};
use crate::validate::{url_authority, url_path, validate_url};

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct GitUrl {
    pub(crate) protocol: String,
    pub(crate) host: String,
    pub(crate) owner: String,
    pub(crate) repo: String,
    pub(crate) branch: String,
    pub(crate) path: String,
    pub(crate) is_file: bool,
    #[serde(skip)]
    token: String,
}

impl GitUrl {
    /// Resolves a GitHub, GitLab or Bitbucket URL into repository coordinates.
    ///
    /// The URL is validated first, then handed to the provider registered for
    /// exactly its host. Any other host is an [`Error::UnsupportedHost`].
    pub fn parse(full_url: &str) -> Result<Self> {
        let url = validate_url(full_url)?;
        let host = url_authority(&url);
        let provider =
            provider_for_host(&host).ok_or_else(|| Error::UnsupportedHost(host.clone()))?;

        let parts = provider.parse_path(&host, &url_path(&url))?;
        debug!(
            provider = provider.name(),
            owner = %parts.owner,
            repo = %parts.repo,
            branch = %parts.branch,
            path = %parts.path,
            is_file = parts.is_file,
            "Parsed git provider URL"
        );

        Ok(Self {
            protocol: url.scheme().to_string(),
            host,
            owner: parts.owner,
            repo: parts.repo,
            branch: parts.branch,
            path: parts.path,
            is_file: parts.is_file,
            token: String::new(),
        })
    }

    /// A repository root on any host, including ones with no registered
    /// provider. Access to such a repository is probed through its `.git` URL.
    pub fn new(protocol: &str, host: &str, owner: &str, repo: &str) -> Result<Self> {
        if owner.is_empty() || repo.is_empty() {
            return Err(Error::path_format(
                "url path should contain <user>/<repo>",
                format!("{owner}/{repo}"),
            ));
        }
        Ok(Self {
            protocol: protocol.to_string(),
            host: host.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: String::new(),
            path: String::new(),
            is_file: false,
            token: String::new(),
        })
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Empty for a bare repository reference.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Empty for a bare repository reference.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    /// Whether a validated token is held. The token itself is not readable.
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn provider(&self) -> Option<&'static dyn GitProvider> {
        provider_for_host(&self.host)
    }

    /// `<protocol>://<host>/<owner>/<repo>.git`, using the provider's clone host.
    pub fn repo_url(&self) -> String {
        let host = match self.provider() {
            Some(provider) => provider.clone_host(&self.host),
            None => &self.host,
        };
        format!("{}://{}/{}/{}.git", self.protocol, host, self.owner, self.repo)
    }

    /// Metadata endpoint probed by [`GitUrl::set_token`] and [`GitUrl::is_public`].
    pub fn api_url(&self) -> String {
        match self.provider() {
            Some(provider) => provider.api_url(&self.owner, &self.repo),
            None => self.repo_url(),
        }
    }

    /// Raw content endpoint for this file.
    ///
    /// Fails with [`Error::PathFormat`] when the coordinate is a directory or a
    /// bare repository, or when the host has no raw content endpoint.
    pub fn raw_file_url(&self) -> Result<String> {
        let provider = self
            .provider()
            .ok_or_else(|| Error::UnsupportedHost(self.host.clone()))?;
        if !self.is_file {
            return Err(Error::path_format(provider.file_url_hint(), self.location()));
        }
        Ok(provider.raw_file_url(self))
    }

    /// Validates `token` against the provider API and stores it on success.
    ///
    /// On failure the stored token is cleared and a [`Error::TokenValidation`]
    /// is returned; nothing else about the coordinate changes.
    pub async fn set_token(&mut self, token: &str, timeout: Option<u64>) -> Result<()> {
        match self.validate_token(token, timeout).await {
            Ok(()) => {
                info!(owner = %self.owner, repo = %self.repo, "Token accepted for repository");
                self.token = token.to_string();
                Ok(())
            }
            Err(e) => {
                warn!(owner = %self.owner, repo = %self.repo, error = %e, "Token rejected for repository");
                self.token.clear();
                Err(Error::TokenValidation(Box::new(e)))
            }
        }
    }

    /// Whether the repository metadata is readable without a token.
    pub async fn is_public(&self, timeout: Option<u64>) -> bool {
        self.validate_token("", timeout).await.is_ok()
    }

    async fn validate_token(&self, token: &str, timeout: Option<u64>) -> Result<()> {
        let params = HttpRequestParams {
            url: self.api_url(),
            token: token.to_string(),
            timeout,
        };
        let body = http_get(&params).await?;
        if body.is_empty() {
            return Err(Error::EmptyResponse(params.url));
        }
        Ok(())
    }

    /// Clone remote with the token, if any, embedded as URL user-info.
    pub(crate) fn clone_url(&self) -> Result<Url> {
        let base = self.repo_url();
        let mut url =
            Url::parse(&base).map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))?;
        if self.has_token() {
            let username = self
                .provider()
                .map_or("token", |provider| provider.token_username());
            url.set_username(username)
                .and_then(|()| url.set_password(Some(&self.token)))
                .map_err(|()| {
                    Error::InvalidUrl(format!("cannot embed credentials in {base}"))
                })?;
        }
        Ok(url)
    }

    /// Replaces every occurrence of the held token in `text`, both as given
    /// and in the percent-encoded form embedded by [`GitUrl::clone_url`].
    pub(crate) fn redact(&self, text: &str) -> String {
        if self.token.is_empty() {
            return text.to_string();
        }
        let mut redacted = text.replace(&self.token, "***");
        let clone_url = self.clone_url().ok();
        if let Some(encoded) = clone_url.as_ref().and_then(Url::password) {
            if encoded != self.token {
                redacted = redacted.replace(encoded, "***");
            }
        }
        redacted
    }

    fn location(&self) -> String {
        if self.path.is_empty() {
            format!("{}/{}", self.owner, self.repo)
        } else {
            format!("{}/{}/{}/{}", self.owner, self.repo, self.branch, self.path)
        }
    }
}

impl FromStr for GitUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitUrl")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("path", &self.path)
            .field("is_file", &self.is_file)
            .field("token", &if self.has_token() { "<redacted>" } else { "" })
            .finish()
    }
}
