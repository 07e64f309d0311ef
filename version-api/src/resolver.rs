use crate::metadata::{BRANCH_KEY, BuildMetadata, COMMIT_HASH_KEY, COMMIT_TIME_KEY};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use version_api_models::version::{UNKNOWN, VersionInfo};

/// The configuration the version information is built from.
#[derive(Clone, Debug)]
pub struct VersionConfig {
    /// The application name.
    pub application_name: String,

    /// The environment to use when the version doesn't carry one.
    pub environment: String,

    /// The application version, optionally suffixed with an environment, e.g. `1.0.0-prod`.
    pub version: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("version can't be empty")]
    EmptyVersion,
}

/// Build the version information out of the configuration and build metadata, stamped with `now`.
pub fn resolve(
    config: &VersionConfig,
    metadata: &BuildMetadata,
    now: DateTime<Utc>,
) -> Result<VersionInfo, ResolveError> {
    let VersionConfig { application_name, environment, version } = config;
    if version.is_empty() {
        return Err(ResolveError::EmptyVersion);
    }
    let lookup = |key: &str| metadata.get(key).unwrap_or(UNKNOWN).to_string();
    let environment = match extract_environment(version) {
        Some(environment) => {
            debug!("Extracted environment '{environment}' from version '{version}'");
            environment
        }
        None => {
            debug!("Using default environment '{environment}' for version '{version}'");
            environment.as_str()
        }
    };
    Ok(VersionInfo {
        version: version.clone(),
        environment: environment.to_string(),
        commit_hash: lookup(COMMIT_HASH_KEY),
        commit_time: lookup(COMMIT_TIME_KEY),
        branch: lookup(BRANCH_KEY),
        build_time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        application_name: application_name.clone(),
    })
}

/// Extract the environment out of a version's last `-` separated segment.
///
/// Empty trailing segments are ignored, so `1.0.0-` carries no environment and `1.0.0-rc-` carries `rc`.
fn extract_environment(version: &str) -> Option<&str> {
    let mut segments: Vec<_> = version.split('-').collect();
    while segments.last().is_some_and(|segment| segment.is_empty()) {
        segments.pop();
    }
    match segments.as_slice() {
        [_, .., last] => Some(*last),
        _ => None,
    }
}
