//! # contract: the seam between callers and remote resources
//!
//! Callers that read devfiles or Kubernetes YAML from a remote source go
//! through [`DevfileUtils`] instead of calling the free functions in
//! [`crate::download`] directly, so the network and the `git` subprocess can
//! be swapped for a mock in tests.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; `MockDevfileUtils` is exported
//!   with the `test-export-mocks` feature (on by default) so downstream
//!   crates can script downloads and clones deterministically.
//!
//! ## Implementations
//! - [`DefaultDevfileUtils`] delegates to [`crate::download::download_in_memory`]
//!   and [`crate::download::clone_git_repo`].

use std::path::Path;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::download;
use crate::error::Result;
use crate::git_url::GitUrl;
use crate::http::HttpRequestParams;

/// Remote access used by devfile and Kubernetes YAML readers.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DevfileUtils: Send + Sync {
    /// Downloads the file behind `params.url` into memory.
    async fn download_in_memory(&self, params: HttpRequestParams) -> Result<Vec<u8>>;

    /// Clones the repository into an existing directory.
    fn clone_git_repo(&self, git_url: &GitUrl, dest_dir: &Path) -> Result<()>;
}

/// Talks to the real providers over HTTP and shells out to `git`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDevfileUtils;

impl DefaultDevfileUtils {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DevfileUtils for DefaultDevfileUtils {
    async fn download_in_memory(&self, params: HttpRequestParams) -> Result<Vec<u8>> {
        download::download_in_memory(&params).await
    }

    fn clone_git_repo(&self, git_url: &GitUrl, dest_dir: &Path) -> Result<()> {
        download::clone_git_repo(git_url, dest_dir)
    }
}
