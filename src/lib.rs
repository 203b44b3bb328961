#![doc = "devfile-remote: remote resource resolution for devfiles and Kubernetes YAML."]

//! Turns a reference to a file or directory on GitHub, GitLab or Bitbucket
//! into repository coordinates ([`GitUrl`]), validates access tokens against
//! the provider API, downloads raw content or clones the repository, and
//! classifies Kubernetes YAML into typed buckets.
//!
//! # Usage
//! Parse with [`GitUrl::parse`], fetch with [`download_in_memory`] and
//! classify with [`kube::parse_kubernetes_yaml`]. Code that should be
//! testable without the network goes through [`contract::DevfileUtils`].

pub mod cli;
pub mod config;
pub mod contract;
pub mod devfile;
pub mod download;
pub mod error;
pub mod git_url;
pub mod http;
pub mod kube;
pub mod load_config;
pub mod provider;
pub mod validate;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_server;

pub use devfile::looks_like_devfile_path;
pub use download::{clone_git_repo, download_in_memory, is_git_provider_repo};
pub use error::{Error, Result};
pub use git_url::GitUrl;
pub use http::{HttpRequestParams, DEFAULT_HTTP_TIMEOUT_SECS};
pub use kube::{classify, KubernetesResources};
pub use validate::validate_url;
