//! Fetching remote content into memory and cloning repositories.

use std::path::Path;
use std::process::Command;

use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::git_url::GitUrl;
use crate::http::{http_get, HttpRequestParams};
use crate::provider::known_hosts;

/// True if `url` mentions any registered provider host anywhere in it.
///
/// Scheme-less input such as `github.com/o/r` counts and is later reported as
/// an unparseable repository.
pub fn is_git_provider_repo(url: &str) -> bool {
    known_hosts().any(|host| url.contains(host))
}

/// Downloads a file into memory.
///
/// Provider URLs are resolved to a [`GitUrl`] and rewritten to the provider's
/// raw content endpoint; they must point at a file. A supplied token is only
/// validated and sent when the repository is not publicly readable. Any
/// other URL is fetched as-is and never receives the token.
pub async fn download_in_memory(params: &HttpRequestParams) -> Result<Vec<u8>> {
    if !is_git_provider_repo(&params.url) {
        if !params.token.is_empty() {
            debug!(url = %params.url, "Not a git provider URL, fetching without the token");
        }
        let anonymous = HttpRequestParams::new(params.url.clone()).with_timeout(params.timeout);
        return http_get(&anonymous).await;
    }

    let git_url = GitUrl::parse(&params.url).map_err(|e| Error::GitRepoParse(Box::new(e)))?;
    let raw_url = git_url
        .raw_file_url()
        .map_err(|e| Error::GitRepoParse(Box::new(e)))?;
    debug!(url = %params.url, raw_url = %raw_url, "Resolved provider URL to raw content");

    fetch_repo_file(git_url, raw_url, &params.token, params.timeout).await
}

/// GETs `raw_url`, a file inside the repository behind `git_url`.
///
/// With a token and a repository that is not public, the token must pass
/// [`GitUrl::set_token`] before it is sent.
pub(crate) async fn fetch_repo_file(
    mut git_url: GitUrl,
    raw_url: String,
    token: &str,
    timeout: Option<u64>,
) -> Result<Vec<u8>> {
    let mut request = HttpRequestParams::new(raw_url).with_timeout(timeout);
    if !token.is_empty() && !git_url.is_public(timeout).await {
        git_url.set_token(token, timeout).await?;
        request.token = token.to_string();
    }

    http_get(&request).await
}

/// Clones the repository behind `git_url` into the existing `dest_dir`.
///
/// Runs `git clone` with credential prompts disabled, so a private repository
/// without a valid token fails instead of waiting for input. A partially
/// populated `dest_dir` is left in place on failure.
pub fn clone_git_repo(git_url: &GitUrl, dest_dir: &Path) -> Result<()> {
    if !dest_dir.exists() {
        error!(path = %dest_dir.display(), "Clone destination does not exist");
        return Err(Error::CloneDestinationMissing(dest_dir.to_path_buf()));
    }

    let with_token = git_url.has_token();
    let remote = git_url.clone_url()?;

    info!(
        repo_url = %git_url.repo_url(),
        path = %dest_dir.display(),
        authenticated = with_token,
        "Cloning git repository"
    );

    let output = Command::new("git")
        .arg("clone")
        .arg(remote.as_str())
        .arg(dest_dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GIT_ASKPASS", "/bin/echo")
        .output();

    match output {
        Ok(output) if output.status.success() => {
            info!(
                repo_url = %git_url.repo_url(),
                path = %dest_dir.display(),
                "Successfully cloned git repository"
            );
            Ok(())
        }
        Ok(output) => {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            let combined = git_url.redact(combined.trim());
            error!(
                repo_url = %git_url.repo_url(),
                path = %dest_dir.display(),
                status = %output.status,
                output = %combined,
                "Git clone exited with non-zero code"
            );
            let detail = if combined.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {combined}", output.status)
            };
            Err(Error::Clone { with_token, detail })
        }
        Err(e) => {
            error!(error = ?e, repo_url = %git_url.repo_url(), "Failed to launch git process");
            Err(Error::Clone {
                with_token,
                detail: format!("failed to launch git: {e}"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{serve, serve_private};

    const RAW_PATH: &str = "/owner/repo/raw/main/devfile.yaml";

    fn local_repo(host: &str) -> GitUrl {
        GitUrl::new("http", host, "owner", "repo").unwrap()
    }

    #[test]
    fn provider_detection_is_substring_based() {
        assert!(is_git_provider_repo("https://github.com/devfile/library"));
        assert!(is_git_provider_repo("github.com/devfile/library"));
        assert!(is_git_provider_repo("https://gitlab.com/o/r/-/raw/main/a.yaml"));
        assert!(is_git_provider_repo("https://bitbucket.org/o/r"));
        assert!(!is_git_provider_repo("https://registry.devfile.io/devfiles/nodejs"));
        assert!(!is_git_provider_repo("http://127.0.0.1:9080"));
    }

    #[tokio::test]
    async fn private_repo_receives_validated_token() {
        let server = serve_private("valid-token", "schemaVersion: 2.2.0").await;

        let data = fetch_repo_file(
            local_repo(&server.host),
            server.url(RAW_PATH),
            "valid-token",
            Some(5),
        )
        .await
        .expect("a valid token should unlock the file");

        assert_eq!(data, b"schemaVersion: 2.2.0".to_vec());
        let requests = server.requests();
        assert_eq!(requests.len(), 3, "{requests:?}");
        assert_eq!(requests[0].path, "/owner/repo.git");
        assert_eq!(requests[0].authorization, None);
        assert_eq!(requests[1].path, "/owner/repo.git");
        assert_eq!(requests[1].authorization.as_deref(), Some("Bearer valid-token"));
        assert_eq!(requests[2].path, RAW_PATH);
        assert_eq!(requests[2].authorization.as_deref(), Some("Bearer valid-token"));
    }

    #[tokio::test]
    async fn rejected_token_stops_before_content_request() {
        let server = serve_private("valid-token", "schemaVersion: 2.2.0").await;

        let err = fetch_repo_file(
            local_repo(&server.host),
            server.url(RAW_PATH),
            "wrong-token",
            Some(5),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::TokenValidation(_)), "got {err:?}");
        assert!(!err.to_string().contains("wrong-token"));
        let requests = server.requests();
        assert_eq!(requests.len(), 2, "{requests:?}");
        assert!(requests.iter().all(|request| request.path != RAW_PATH));
    }

    #[tokio::test]
    async fn public_repo_is_fetched_anonymously() {
        let server = serve(200, "schemaVersion: 2.2.0").await;

        fetch_repo_file(local_repo(&server.host), server.url(RAW_PATH), "valid-token", Some(5))
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 2, "{requests:?}");
        assert_eq!(requests[1].path, RAW_PATH);
        assert_eq!(requests[1].authorization, None);
    }

    #[tokio::test]
    async fn no_token_skips_visibility_check() {
        let server = serve(200, "schemaVersion: 2.2.0").await;

        fetch_repo_file(local_repo(&server.host), server.url(RAW_PATH), "", Some(5))
            .await
            .unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, RAW_PATH);
    }
}
