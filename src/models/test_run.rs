//! Test run model: the top-level document sent to the collection server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SpecStatus, SuiteRun};

/// Fixed client identifier sent with every run.
pub const CLIENT_TYPE: &str = "rust-jest-reporter";

/// One normalized test run, constructed per run-complete event.
///
/// `id` and `test_seed` share a clock-derived value (epoch milliseconds
/// scaled to nanoseconds plus the sub-millisecond component); unique with
/// very high probability across runs on the same host, not guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRun {
    pub id: i64,
    pub test_project_name: String,
    pub test_project_id: String,
    pub test_seed: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub git_branch: String,
    pub git_sha: String,
    pub build_trigger_actor: String,
    pub build_url: String,
    pub client_type: String,
    pub suite_runs: Vec<SuiteRun>,
}

/// Spec counts aggregated over a whole run, for the pre-transmission summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunStats {
    /// Count spec outcomes across all suites of a run.
    pub fn of(run: &TestRun) -> Self {
        let mut stats = RunStats {
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
        };

        for suite in &run.suite_runs {
            for spec in &suite.spec_runs {
                stats.total += 1;
                match spec.status {
                    SpecStatus::Passed => stats.passed += 1,
                    SpecStatus::Failed => stats.failed += 1,
                    SpecStatus::Skipped => stats.skipped += 1,
                    SpecStatus::Pending | SpecStatus::Unknown => {}
                }
            }
        }

        stats
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} total, {} passed, {} failed, {} skipped",
            self.total, self.passed, self.failed, self.skipped
        )
    }
}
