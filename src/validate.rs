use percent_encoding::percent_decode_str;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Checks that `raw` is an absolute http(s) URL with a non-empty path.
///
/// Runs before any provider-specific parsing; a failure here short-circuits it.
pub fn validate_url(raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(Error::InvalidUrl("url should not be empty".into()));
    }

    let parsed = Url::parse(raw).map_err(|e| {
        debug!(url = raw, error = %e, "URL failed to parse");
        Error::InvalidUrl(format!("{raw}: {e}"))
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::InvalidUrl(format!(
                "url scheme should be http or https; received: {other}"
            )))
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(Error::InvalidUrl(format!("url should contain a host: {raw}")));
    }

    if url_path(&parsed).is_empty() {
        return Err(Error::InvalidUrl("url path should not be empty".into()));
    }

    Ok(parsed)
}

/// The decoded URL path without its leading slash. Percent-escapes are
/// resolved here so provider endpoints encode each character exactly once.
pub(crate) fn url_path(url: &Url) -> String {
    let path = url.path().strip_prefix('/').unwrap_or(url.path());
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

/// The URL authority as compared against provider hosts: host plus any
/// explicit port, so `github.com:8443` never matches `github.com`.
pub(crate) fn url_authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("https://github.com/devfile/library").is_ok());
        assert!(validate_url("http://127.0.0.1:9080/resources.yaml").is_ok());
    }

    #[test]
    fn rejects_malformed_input() {
        for input in [
            "",
            "   ",
            "github.com/devfile/library",
            "ftp://github.com/devfile/library",
            "file:///tmp/devfile.yaml",
            "https://github.com",
            "https://github.com/",
        ] {
            let err = validate_url(input).unwrap_err();
            assert!(
                matches!(err, Error::InvalidUrl(_)),
                "{input:?} should be rejected as invalid, got {err:?}"
            );
        }
    }

    #[test]
    fn authority_keeps_explicit_port() {
        let url = Url::parse("https://github.com:8443/o/r").unwrap();
        assert_eq!(url_authority(&url), "github.com:8443");
        let url = Url::parse("https://github.com/o/r").unwrap();
        assert_eq!(url_authority(&url), "github.com");
    }

    #[test]
    fn path_is_decoded_once() {
        let url = Url::parse("https://gitlab.com/o/r/-/blob/main/my%20dir/dev%20file.yaml").unwrap();
        assert_eq!(url_path(&url), "o/r/-/blob/main/my dir/dev file.yaml");
    }

    #[test]
    fn host_case_is_normalised_before_matching() {
        let url = validate_url("https://GitHub.com/devfile/library").unwrap();
        assert_eq!(url_authority(&url), "github.com");
    }
}
