use std::path::Path;

use covpost::env::Env;
use covpost::git;
use covpost::params::ParameterSet;

/// Init a repository on branch `main` with a single commit; returns the
/// commit id.
fn setup_repo(dir: &Path) -> git2::Oid {
    let repo = git2::Repository::init(dir).unwrap();
    repo.set_head("refs/heads/main").unwrap();

    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }

    std::fs::write(dir.join("file.txt"), "hello\n").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("file.txt")).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = repo.signature().unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap()
}

#[test]
fn local_params_reads_branch_and_commit() {
    let dir = tempfile::tempdir().unwrap();
    let commit_id = setup_repo(dir.path());

    let params = git::local_params(dir.path(), &Env::default(), ParameterSet::new()).unwrap();

    assert_eq!(params.get_str("branch"), Some("main"));
    assert_eq!(params.get_str("commit"), Some(commit_id.to_string().as_str()));
}

#[test]
fn local_params_caller_keys_win() {
    let dir = tempfile::tempdir().unwrap();
    setup_repo(dir.path());

    let mut params = ParameterSet::new();
    params.insert("branch", "release");

    let params = git::local_params(dir.path(), &Env::default(), params).unwrap();

    assert_eq!(params.get_str("branch"), Some("release"));
    // Commit was not supplied, so the repository value fills it in.
    assert!(params.get_str("commit").is_some());
}

#[test]
fn deprecated_repo_token_fills_token() {
    let dir = tempfile::tempdir().unwrap();
    setup_repo(dir.path());

    let env: Env = [("REPO_TOKEN", "legacy")].into_iter().collect();
    let params = git::local_params(dir.path(), &env, ParameterSet::new()).unwrap();

    assert_eq!(params.get_str("token"), Some("legacy"));
}

#[test]
fn explicit_token_beats_deprecated_repo_token() {
    let dir = tempfile::tempdir().unwrap();
    setup_repo(dir.path());

    let env: Env = [("REPO_TOKEN", "legacy")].into_iter().collect();
    let mut params = ParameterSet::new();
    params.insert("token", "explicit");

    let params = git::local_params(dir.path(), &env, params).unwrap();

    assert_eq!(params.get_str("token"), Some("explicit"));
}

#[test]
fn missing_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = git::local_params(dir.path(), &Env::default(), ParameterSet::new());
    assert!(result.is_err());
}
