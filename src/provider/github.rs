use super::{escape_path, GitProvider, PathParts};
use crate::error::{Error, Result};
use crate::git_url::GitUrl;

pub const GITHUB_HOST: &str = "github.com";
pub const RAW_GITHUB_HOST: &str = "raw.githubusercontent.com";

/// github.com and its raw content host.
///
/// Web URLs mark files and directories explicitly with `blob` and `tree`;
/// raw URLs always point at a file.
pub struct GitHub;

impl GitProvider for GitHub {
    fn name(&self) -> &'static str {
        "GitHub"
    }

    fn hosts(&self) -> &'static [&'static str] {
        &[GITHUB_HOST, RAW_GITHUB_HOST]
    }

    fn parse_path(&self, host: &str, path: &str) -> Result<PathParts> {
        if host == RAW_GITHUB_HOST {
            let segments: Vec<&str> = path.splitn(4, '/').collect();
            if segments.len() != 4 {
                return Err(Error::path_format(
                    "raw url path should contain <owner>/<repo>/<branch>/<path/to/file>",
                    path,
                ));
            }
            return Ok(PathParts::repository(segments[0], segments[1], path)?.at(
                segments[2],
                segments[3],
                true,
            ));
        }

        let segments: Vec<&str> = path.splitn(5, '/').collect();
        if segments.len() < 2 {
            return Err(Error::path_format(
                "url path should contain <user>/<repo>",
                path,
            ));
        }
        let parts = PathParts::repository(segments[0], segments[1], path)?;
        if segments.len() < 5 {
            return Ok(parts);
        }

        let is_file = match segments[2] {
            "tree" => false,
            "blob" => true,
            _ => {
                return Err(Error::path_format(
                    self.file_url_hint(),
                    path,
                ))
            }
        };
        Ok(parts.at(segments[3], segments[4], is_file))
    }

    fn api_url(&self, owner: &str, repo: &str) -> String {
        format!("https://api.{GITHUB_HOST}/repos/{owner}/{repo}")
    }

    fn raw_file_url(&self, git_url: &GitUrl) -> String {
        format!(
            "https://{RAW_GITHUB_HOST}/{}/{}/{}/{}",
            git_url.owner,
            git_url.repo,
            escape_path(&git_url.branch),
            escape_path(&git_url.path)
        )
    }

    fn file_url_hint(&self) -> &'static str {
        "url path to directory or file should contain 'tree' or 'blob'"
    }

    fn clone_host<'a>(&self, host: &'a str) -> &'a str {
        if host == RAW_GITHUB_HOST {
            GITHUB_HOST
        } else {
            host
        }
    }
}
