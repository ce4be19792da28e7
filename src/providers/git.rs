//! Git metadata resolution.
//!
//! CI environment variables are consulted first (they are authoritative on
//! build agents, where the checkout may be a detached HEAD), then the local
//! `git` binary; either field degrades to the literal `"unknown"`.

use std::env;

use tracing::debug;

/// Sentinel for an undeterminable branch or sha.
const UNKNOWN: &str = "unknown";

/// Repository metadata for the run being reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub branch: String,
    pub sha: String,
}

impl GitInfo {
    /// Both fields set to the `"unknown"` sentinel.
    pub fn unknown() -> Self {
        GitInfo {
            branch: UNKNOWN.to_string(),
            sha: UNKNOWN.to_string(),
        }
    }
}

/// Resolve branch and sha for the current checkout.
pub async fn resolve() -> GitInfo {
    let get = |key: &str| env::var(key).ok().filter(|v| !v.is_empty());

    let branch = match branch_from_env(&get) {
        Some(branch) => branch,
        None => git_output(&["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .unwrap_or_else(|| UNKNOWN.to_string()),
    };

    let sha = match get("GITHUB_SHA") {
        Some(sha) => sha,
        None => git_output(&["rev-parse", "HEAD"])
            .await
            .unwrap_or_else(|| UNKNOWN.to_string()),
    };

    debug!("Git resolution: branch={}, sha={}", branch, sha);
    GitInfo { branch, sha }
}

/// Branch from CI variables: the PR head ref when present, else the ref
/// name of the triggering push.
fn branch_from_env<F>(get: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    get("GITHUB_HEAD_REF").or_else(|| get("GITHUB_REF_NAME"))
}

/// Run a git subcommand and capture its trimmed stdout.
async fn git_output(args: &[&str]) -> Option<String> {
    let output = tokio::process::Command::new("git")
        .args(args)
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}
