//! Git hosting providers and their URL grammars.
//!
//! Each provider implements [`GitProvider`] and is listed once in
//! [`PROVIDERS`]. Dispatch is an exact match of the URL authority against
//! [`GitProvider::hosts`], so subdomains (and explicit ports) of a known host
//! are unsupported. Adding a provider means adding an implementation and a
//! registry entry; nothing else changes.

mod bitbucket;
mod github;
mod gitlab;

pub use bitbucket::{Bitbucket, BITBUCKET_HOST};
pub use github::{GitHub, GITHUB_HOST, RAW_GITHUB_HOST};
pub use gitlab::{GitLab, GITLAB_HOST};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Error, Result};
use crate::git_url::GitUrl;

/// Everything outside the RFC 3986 unreserved set.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
/// As [`SEGMENT`], but `/` separates segments and stays as-is.
const PATH: &AsciiSet = &SEGMENT.remove(b'/');

/// Coordinates extracted from a provider URL path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParts {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub is_file: bool,
}

impl PathParts {
    /// A bare repository reference. Both names must be non-empty.
    pub(crate) fn repository(owner: &str, repo: &str, received: &str) -> Result<Self> {
        if owner.is_empty() || repo.is_empty() {
            return Err(Error::path_format(
                "url path should contain <user>/<repo>",
                received,
            ));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            ..Self::default()
        })
    }

    pub(crate) fn at(mut self, branch: &str, path: &str, is_file: bool) -> Self {
        self.branch = branch.to_string();
        self.path = path.to_string();
        self.is_file = is_file;
        self
    }
}

/// Per-provider URL grammar and endpoint layout.
pub trait GitProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Hosts served by this provider, compared by exact string equality.
    fn hosts(&self) -> &'static [&'static str];

    /// Splits the URL path (without its leading slash) into coordinates.
    fn parse_path(&self, host: &str, path: &str) -> Result<PathParts>;

    /// Repository metadata endpoint used to probe access.
    fn api_url(&self, owner: &str, repo: &str) -> String;

    /// Raw content endpoint for a file coordinate.
    fn raw_file_url(&self, git_url: &GitUrl) -> String;

    /// Explains which URL form identifies a file, for error messages.
    fn file_url_hint(&self) -> &'static str;

    /// Host to clone from; some content hosts cannot serve git.
    fn clone_host<'a>(&self, host: &'a str) -> &'a str {
        host
    }

    /// User name paired with a token in an authenticated clone URL.
    fn token_username(&self) -> &'static str {
        "token"
    }
}

static PROVIDERS: &[&dyn GitProvider] = &[&GitHub, &GitLab, &Bitbucket];

/// Looks up the provider serving exactly `host`.
#[must_use]
pub fn provider_for_host(host: &str) -> Option<&'static dyn GitProvider> {
    PROVIDERS
        .iter()
        .copied()
        .find(|provider| provider.hosts().contains(&host))
}

/// Every host of every registered provider.
pub fn known_hosts() -> impl Iterator<Item = &'static str> {
    PROVIDERS
        .iter()
        .flat_map(|provider| provider.hosts().iter().copied())
}

/// True if the final path segment has a `.` suffix, like Go's `filepath.Ext`
/// being non-empty. Extensionless files are indistinguishable from
/// directories and report false.
pub(crate) fn has_file_extension(path: &str) -> bool {
    let leaf = path.rsplit('/').next().unwrap_or(path);
    leaf.contains('.')
}

/// Percent-encodes everything outside the RFC 3986 unreserved set, including `/`.
pub(crate) fn escape_path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Percent-encodes each `/`-separated segment of `raw`.
pub(crate) fn escape_path(raw: &str) -> String {
    utf8_percent_encode(raw, PATH).to_string()
}
