//! Branch and commit metadata from a local repository checkout, for
//! submissions that bypass CI provider detection.

use std::path::Path;

use git2::Repository;

use crate::env::Env;
use crate::error::Result;
use crate::params::ParameterSet;

/// Complete `params` from a local checkout instead of CI environment
/// variables: the head branch name and commit id become `branch`/`commit`
/// defaults (caller-supplied keys win). The deprecated `REPO_TOKEN`
/// variable is honored as a token source with a warning.
pub fn local_params(path: &Path, env: &Env, mut params: ParameterSet) -> Result<ParameterSet> {
    let (branch, commit) = head_info(path)?;

    let mut defaults = ParameterSet::new();
    defaults.insert("branch", branch);
    defaults.insert("commit", commit);

    if let Some(token) = env.var("REPO_TOKEN") {
        eprintln!("Warning: REPO_TOKEN is deprecated, use CODECOV_TOKEN instead");
        defaults.insert("token", token);
    }

    params.set_defaults(&defaults);
    Ok(params)
}

/// Read the head reference's short branch name and the commit it resolves
/// to. Repository and reference handles never leave this function; they are
/// released on every exit path, including extraction failures.
fn head_info(path: &Path) -> Result<(String, String)> {
    let repo = Repository::discover(path)?;
    let head = repo.head()?;
    let branch = head.shorthand().unwrap_or("HEAD").to_string();
    let commit = head.peel_to_commit()?.id().to_string();
    Ok((branch, commit))
}
