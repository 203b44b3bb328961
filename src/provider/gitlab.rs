use super::{escape_path_segment, has_file_extension, GitProvider, PathParts};
use crate::error::{Error, Result};
use crate::git_url::GitUrl;

pub const GITLAB_HOST: &str = "gitlab.com";

/// gitlab.com. The repository root and the in-repo location are separated
/// by `/-/`; files are recognised by their extension only.
pub struct GitLab;

impl GitProvider for GitLab {
    fn name(&self) -> &'static str {
        "GitLab"
    }

    fn hosts(&self) -> &'static [&'static str] {
        &[GITLAB_HOST]
    }

    fn parse_path(&self, _host: &str, path: &str) -> Result<PathParts> {
        let mut split = path.splitn(2, "/-/");
        let organization = split.next().unwrap_or_default();
        let location = split.next();

        let org: Vec<&str> = organization.splitn(2, '/').collect();
        if org.len() < 2 {
            return Err(Error::path_format(
                "url path should contain <user>/<repo>",
                path,
            ));
        }
        let parts = PathParts::repository(org[0], org[1], path)?;

        let Some(location) = location else {
            return Ok(parts);
        };
        let segments: Vec<&str> = location.splitn(3, '/').collect();
        if segments.len() != 3 || !matches!(segments[0], "blob" | "tree" | "raw") {
            return Err(Error::path_format(
                "url path should contain 'blob' or 'tree' or 'raw'",
                path,
            ));
        }
        let is_file = has_file_extension(segments[2]);
        Ok(parts.at(segments[1], segments[2], is_file))
    }

    fn api_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "https://{GITLAB_HOST}/api/v4/projects/{}",
            escape_path_segment(&format!("{owner}/{repo}"))
        )
    }

    fn raw_file_url(&self, git_url: &GitUrl) -> String {
        format!(
            "{}/repository/files/{}/raw?ref={}",
            self.api_url(&git_url.owner, &git_url.repo),
            escape_path_segment(&git_url.path),
            escape_path_segment(&git_url.branch)
        )
    }

    fn file_url_hint(&self) -> &'static str {
        "url path to a file should contain '/-/blob/', '/-/tree/' or '/-/raw/' and a file extension"
    }
}
