use super::{escape_path, has_file_extension, GitProvider, PathParts};
use crate::error::{Error, Result};
use crate::git_url::GitUrl;

pub const BITBUCKET_HOST: &str = "bitbucket.org";

/// bitbucket.org. Locations are `<owner>/<repo>/(src|raw)/<branch>/<path>`.
pub struct Bitbucket;

impl GitProvider for Bitbucket {
    fn name(&self) -> &'static str {
        "Bitbucket"
    }

    fn hosts(&self) -> &'static [&'static str] {
        &[BITBUCKET_HOST]
    }

    fn parse_path(&self, _host: &str, path: &str) -> Result<PathParts> {
        let segments: Vec<&str> = path.splitn(5, '/').collect();
        match segments.len() {
            0 | 1 => Err(Error::path_format(
                "url path should contain <user>/<repo>",
                path,
            )),
            2 => PathParts::repository(segments[0], segments[1], path),
            5 => {
                let parts = PathParts::repository(segments[0], segments[1], path)?;
                if !matches!(segments[2], "raw" | "src") {
                    return Err(Error::path_format(
                        "url path should contain 'raw' or 'src'",
                        path,
                    ));
                }
                let is_file = has_file_extension(segments[4]);
                Ok(parts.at(segments[3], segments[4], is_file))
            }
            _ => Err(Error::path_format(
                "url path should contain path to directory or file",
                path,
            )),
        }
    }

    fn api_url(&self, owner: &str, repo: &str) -> String {
        format!("https://api.{BITBUCKET_HOST}/2.0/repositories/{owner}/{repo}")
    }

    fn raw_file_url(&self, git_url: &GitUrl) -> String {
        format!(
            "{}/src/{}/{}",
            self.api_url(&git_url.owner, &git_url.repo),
            escape_path(&git_url.branch),
            escape_path(&git_url.path)
        )
    }

    fn file_url_hint(&self) -> &'static str {
        "url path to a file should contain 'src' or 'raw' and a file extension"
    }

    fn token_username(&self) -> &'static str {
        "x-token-auth"
    }
}
