//! CI platform detection and metadata extraction.
//!
//! Each supported platform maps its own environment-variable vocabulary onto
//! the uniform schema the upload endpoint expects: `service`, `branch`,
//! `commit`, `pull_request`, `job`, `slug`, `build` (and `build_url` where
//! the platform provides one).

use crate::env::Env;
use crate::error::{CovpostError, Result};
use crate::params::ParameterSet;

/// A continuous-integration platform whose environment variables we know
/// how to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    AppVeyor,
    Travis,
    CircleCi,
}

impl Provider {
    /// Detect the current platform from its indicator flag. Checked in a
    /// fixed order; the first flag set to true wins.
    pub fn detect(env: &Env) -> Option<Provider> {
        if env.flag("APPVEYOR") {
            Some(Provider::AppVeyor)
        } else if env.flag("TRAVIS") {
            Some(Provider::Travis)
        } else if env.flag("CIRCLECI") {
            Some(Provider::CircleCi)
        } else {
            None
        }
    }

    /// The `service` identifier the upload endpoint expects.
    pub fn service(&self) -> &'static str {
        match self {
            Provider::AppVeyor => "appveyor",
            Provider::Travis => "travis-org",
            Provider::CircleCi => "circleci",
        }
    }

    /// Extract this platform's metadata from the environment. Absent
    /// variables map to empty strings unless noted otherwise.
    pub fn metadata(&self, env: &Env) -> ParameterSet {
        let var = |name: &str| env.var(name).unwrap_or("").to_string();

        let mut params = ParameterSet::new();
        params.insert("service", self.service());

        match self {
            Provider::AppVeyor => {
                params.insert("branch", var("APPVEYOR_REPO_BRANCH"));
                params.insert("commit", var("APPVEYOR_REPO_COMMIT"));
                params.insert("pull_request", var("APPVEYOR_PULL_REQUEST_NUMBER"));
                // Account, project slug, and build version joined into one
                // pre-escaped job identifier.
                params.insert(
                    "job",
                    format!(
                        "{}%2F{}%2F{}",
                        var("APPVEYOR_ACCOUNT_NAME"),
                        var("APPVEYOR_PROJECT_SLUG"),
                        var("APPVEYOR_BUILD_VERSION")
                    ),
                );
                params.insert("slug", var("APPVEYOR_REPO_NAME"));
                params.insert("build", var("APPVEYOR_JOB_ID"));
            }
            Provider::Travis => {
                params.insert("branch", var("TRAVIS_BRANCH"));
                params.insert("commit", var("TRAVIS_COMMIT"));
                // Travis sets this to "false" itself on non-PR builds.
                params.insert("pull_request", var("TRAVIS_PULL_REQUEST"));
                params.insert("job", var("TRAVIS_JOB_ID"));
                params.insert("slug", var("TRAVIS_REPO_SLUG"));
                params.insert("build", var("TRAVIS_JOB_NUMBER"));
            }
            Provider::CircleCi => {
                params.insert("branch", var("CIRCLE_BRANCH"));
                params.insert("commit", var("CIRCLE_SHA1"));
                params.insert(
                    "pull_request",
                    env.var("CIRCLE_PR_NUMBER").unwrap_or("false").to_string(),
                );
                params.insert("build", var("CIRCLE_BUILD_NUM"));
                params.insert("build_url", var("CIRCLE_BUILD_URL"));
                params.insert(
                    "slug",
                    format!(
                        "{}%2F{}",
                        var("CIRCLE_PROJECT_USERNAME"),
                        var("CIRCLE_PROJECT_REPONAME")
                    ),
                );
            }
        }

        params
    }
}

/// Complete `params` with CI metadata from the environment. Caller-supplied
/// keys always win over platform-derived defaults. Fails when no supported
/// platform is detected.
pub fn resolve(env: &Env, mut params: ParameterSet) -> Result<ParameterSet> {
    let provider = Provider::detect(env).ok_or(CovpostError::NoProvider)?;
    params.set_defaults(&provider.metadata(env));
    Ok(params)
}
