//! CI provider detection from environment variables.

use std::env;

use tracing::debug;

/// Sentinel actor for runs outside any CI system.
const LOCAL_ACTOR: &str = "local-developer";

/// Sentinel actor when CI is detected but no provider identifies the user.
const CI_ACTOR: &str = "ci-user";

/// Build metadata gathered from the CI environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiInfo {
    pub actor: String,
    pub build_url: String,
    pub is_ci: bool,
    pub provider: Option<String>,
}

impl CiInfo {
    /// The local-developer default used outside CI.
    pub fn local() -> Self {
        CiInfo {
            actor: LOCAL_ACTOR.to_string(),
            build_url: String::new(),
            is_ci: false,
            provider: None,
        }
    }

    /// Generic fallback when CI indicators are present but no specific
    /// provider variables match.
    fn generic() -> Self {
        CiInfo {
            actor: CI_ACTOR.to_string(),
            build_url: String::new(),
            is_ci: true,
            provider: None,
        }
    }
}

/// Detect the current CI provider from the process environment.
pub fn detect() -> CiInfo {
    let info = detect_with(|key| env::var(key).ok());
    debug!(
        "CI detection: provider={:?}, actor={}, is_ci={}",
        info.provider, info.actor, info.is_ci
    );
    info
}

/// Detection over an injected lookup. Providers are checked in a fixed
/// order; the generic-CI fallback applies only when a generic indicator is
/// set but no provider matched.
fn detect_with<F>(get: F) -> CiInfo
where
    F: Fn(&str) -> Option<String>,
{
    if get("GITHUB_ACTIONS").as_deref() == Some("true") {
        let build_url = match (
            get("GITHUB_SERVER_URL"),
            get("GITHUB_REPOSITORY"),
            get("GITHUB_RUN_ID"),
        ) {
            (Some(server), Some(repo), Some(run_id)) => {
                format!("{}/{}/actions/runs/{}", server, repo, run_id)
            }
            _ => String::new(),
        };
        return CiInfo {
            actor: get("GITHUB_ACTOR").unwrap_or_else(|| CI_ACTOR.to_string()),
            build_url,
            is_ci: true,
            provider: Some("github-actions".to_string()),
        };
    }

    if get("GITLAB_CI").as_deref() == Some("true") {
        return CiInfo {
            actor: get("GITLAB_USER_LOGIN").unwrap_or_else(|| CI_ACTOR.to_string()),
            build_url: get("CI_JOB_URL")
                .or_else(|| get("CI_PIPELINE_URL"))
                .unwrap_or_default(),
            is_ci: true,
            provider: Some("gitlab-ci".to_string()),
        };
    }

    if get("JENKINS_URL").is_some() {
        return CiInfo {
            actor: get("BUILD_USER_ID")
                .or_else(|| get("BUILD_USER"))
                .unwrap_or_else(|| CI_ACTOR.to_string()),
            build_url: get("BUILD_URL").unwrap_or_default(),
            is_ci: true,
            provider: Some("jenkins".to_string()),
        };
    }

    if get("CIRCLECI").as_deref() == Some("true") {
        return CiInfo {
            actor: get("CIRCLE_USERNAME").unwrap_or_else(|| CI_ACTOR.to_string()),
            build_url: get("CIRCLE_BUILD_URL").unwrap_or_default(),
            is_ci: true,
            provider: Some("circleci".to_string()),
        };
    }

    match get("CI").as_deref() {
        Some("true") | Some("1") => CiInfo::generic(),
        _ => CiInfo::local(),
    }
}
