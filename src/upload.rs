//! Generic upload: parameter merging, URI construction, and the HTTP POST.

use crate::env::Env;
use crate::error::{CovpostError, Result};
use crate::model::FileCoverage;
use crate::params::{ParameterSet, Value};
use crate::payload;

/// Default service origin when no `codecov_url` override is given.
pub const DEFAULT_URL: &str = "https://codecov.io";

/// Parameters consumed by the uploader itself, never transmitted.
const CONTROL_PARAMS: [&str; 2] = ["codecov_url", "dry_run"];

/// Upload coverage, or simulate the upload when the `dry_run` parameter is
/// present (its value is ignored).
///
/// The `CODECOV_URL` and `CODECOV_TOKEN` environment variables are merged
/// in as defaults for `codecov_url`/`token`; explicit parameter values win.
/// The constructed URI is printed to stderr in either mode. Returns the raw
/// response body, or `None` for a dry run. A transport or HTTP-status
/// failure propagates unmodified; there are no retries.
pub fn upload(
    files: &[FileCoverage],
    mut params: ParameterSet,
    env: &Env,
) -> Result<Option<String>> {
    let mut overrides = ParameterSet::new();
    if let Some(url) = env.var("CODECOV_URL") {
        overrides.insert("codecov_url", url);
    }
    if let Some(token) = env.var("CODECOV_TOKEN") {
        overrides.insert("token", token);
    }
    params.set_defaults(&overrides);

    let uri = build_uri(&params)?;
    eprintln!("{}", uri);

    if params.contains("dry_run") {
        return Ok(None);
    }

    let body = payload::coverage_payload(files);
    let response = ureq::post(&uri)
        .set("Content-Type", "application/json")
        .send_json(&body)
        .map_err(Box::new)?;

    let text = response.into_string()?;
    println!("{}", text);
    Ok(Some(text))
}

/// Construct `<base>/upload/v2?` followed by `&name=value` for every
/// non-control parameter, in insertion order.
///
/// Values are emitted as-is: no URL-encoding is applied beyond the literal
/// `%2F` escapes platform-derived values already carry. Arbitrary caller
/// values containing reserved query characters are therefore under-encoded;
/// this matches the upstream wire contract.
pub fn build_uri(params: &ParameterSet) -> Result<String> {
    let base = match params.get("codecov_url") {
        Some(Value::Str(url)) => url.as_str(),
        Some(other) => {
            return Err(CovpostError::Precondition(format!(
                "codecov_url must be a string, got '{}'",
                other
            )))
        }
        None => DEFAULT_URL,
    };

    if base.ends_with('/') {
        return Err(CovpostError::Precondition(format!(
            "base URL must not end with '/': {}",
            base
        )));
    }
    if params.is_empty() {
        return Err(CovpostError::Precondition(
            "no parameters supplied for upload".to_string(),
        ));
    }

    let mut uri = format!("{}/upload/v2?", base);
    for (name, value) in params.iter() {
        if CONTROL_PARAMS.contains(&name) {
            continue;
        }
        uri.push_str(&format!("&{}={}", name, value));
    }
    Ok(uri)
}
