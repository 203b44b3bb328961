//! Error types for remote resource resolution.
//!
//! Every failure the crate can report maps onto one variant of [`Error`].
//! None of the messages carry a token: URLs embedded in errors are always the
//! credential-free request or API URL.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// Empty input, empty URL path, unparseable URL or a non-http(s) scheme.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The host is not one of the registered git providers.
    #[error("url host should be a valid GitHub, GitLab, or Bitbucket host; received: {0}")]
    UnsupportedHost(String),

    /// The URL path does not follow the matched provider's grammar.
    #[error("{message}, received: {path}")]
    PathFormat { message: String, path: String },

    /// The authenticated probe against the provider API failed.
    #[error("failed to set token. error: {0}")]
    TokenValidation(Box<Error>),

    /// A provider URL could not be resolved before fetching it.
    #[error("failed to parse git repo. error: {0}")]
    GitRepoParse(Box<Error>),

    /// A non-2xx response. `url` is the final resolved URL of the request.
    #[error("failed to retrieve {url}, {status}: {reason}")]
    Fetch {
        url: String,
        status: u16,
        reason: String,
    },

    /// The request never produced a response.
    #[error("failed to retrieve {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A non-provider URL that cannot be requested over http(s).
    #[error("unsupported protocol scheme in url: {0}")]
    UnsupportedScheme(String),

    /// The probe returned a successful but empty body.
    #[error("empty response from {0}")]
    EmptyResponse(String),

    /// A document is missing a usable `kind` or `metadata.name`.
    #[error("failed to decode kubernetes document {index}: {message}")]
    Decode { index: usize, message: String },

    /// The raw bytes are not valid YAML.
    #[error("failed to parse yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to clone repo, destination directory: '{0}' does not exists")]
    CloneDestinationMissing(PathBuf),

    /// `git clone` could not be launched or exited unsuccessfully.
    #[error("{}", clone_message(.with_token, .detail))]
    Clone { with_token: bool, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn clone_message(with_token: &bool, detail: &str) -> String {
    if *with_token {
        format!("failed to clone repo with token, ensure that the url and token is correct. error: {detail}")
    } else {
        format!("failed to clone repo without a token, ensure that a token is set if the repo is private. error: {detail}")
    }
}

impl Error {
    pub(crate) fn path_format(message: impl Into<String>, path: impl Into<String>) -> Self {
        Error::PathFormat {
            message: message.into(),
            path: path.into(),
        }
    }

    /// HTTP status of a failed fetch, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Fetch { status, .. } => Some(*status),
            Error::TokenValidation(inner) | Error::GitRepoParse(inner) => inner.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_message_depends_on_token_presence() {
        let anonymous = Error::Clone {
            with_token: false,
            detail: "exit status: 128".into(),
        };
        assert!(anonymous.to_string().contains("without a token"));

        let authenticated = Error::Clone {
            with_token: true,
            detail: "exit status: 128".into(),
        };
        assert!(authenticated.to_string().contains("with token"));
    }

    #[test]
    fn status_is_reachable_through_wrappers() {
        let fetch = Error::Fetch {
            url: "https://api.github.com/repos/o/r".into(),
            status: 404,
            reason: "Not Found".into(),
        };
        let wrapped = Error::TokenValidation(Box::new(fetch));
        assert_eq!(wrapped.status(), Some(404));
        assert!(wrapped
            .to_string()
            .starts_with("failed to set token. error: failed to retrieve"));
    }
}
