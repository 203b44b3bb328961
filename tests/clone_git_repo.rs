mod common;

use devfile_remote::{clone_git_repo, Error, GitUrl};
use tempfile::tempdir;

#[test]
fn missing_destination_fails_before_running_git() {
    let git_url = GitUrl::parse("https://github.com/devfile/library").unwrap();
    let parent = tempdir().unwrap();
    let dest = parent.path().join("does-not-exist");

    let err = clone_git_repo(&git_url, &dest).unwrap_err();

    assert!(matches!(err, Error::CloneDestinationMissing(_)));
    assert!(err.to_string().contains("does not exists"));
    assert!(!dest.exists(), "clone must not create the destination");
}

#[test]
fn failed_anonymous_clone_asks_for_a_token() {
    let git_url = GitUrl::new("http", "127.0.0.1:1", "owner", "repo").unwrap();
    let dest = tempdir().unwrap();

    let err = clone_git_repo(&git_url, dest.path()).unwrap_err();

    assert!(matches!(err, Error::Clone { with_token: false, .. }), "got {err:?}");
    assert!(err
        .to_string()
        .starts_with("failed to clone repo without a token"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_authenticated_clone_hides_the_token() {
    let server = common::serve(200, "not a git repository").await;
    let mut git_url = GitUrl::new("http", &server.host, "owner", "repo").unwrap();
    git_url
        .set_token("tkn-5f3a9c", Some(5))
        .await
        .expect("probe should accept the token");
    let dest = tempdir().unwrap();
    let dest_path = dest.path().to_path_buf();

    let err = tokio::task::spawn_blocking(move || clone_git_repo(&git_url, &dest_path))
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, Error::Clone { with_token: true, .. }), "got {err:?}");
    let msg = err.to_string();
    assert!(msg.starts_with("failed to clone repo with token"), "got: {msg}");
    assert!(!msg.contains("tkn-5f3a9c"), "token leaked: {msg}");
}

#[test]
#[ignore = "requires network access to GitHub"]
fn clones_public_repository() {
    let git_url = GitUrl::parse("https://github.com/devfile/registry-support").unwrap();
    let dest = tempdir().unwrap();

    clone_git_repo(&git_url, dest.path()).expect("public clone should succeed");

    let entries = std::fs::read_dir(dest.path()).unwrap();
    assert!(entries.take(1).count() > 0, "clone should populate the directory");
}
