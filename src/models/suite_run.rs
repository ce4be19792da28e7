//! Suite run model representing one normalized test file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SpecRun;

/// Normalized results for one test file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteRun {
    /// 1-based sequence number within the parent test run
    pub id: i64,
    /// Parent test run id
    pub test_run_id: i64,
    /// Suite name derived from the test file path
    pub suite_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub spec_runs: Vec<SpecRun>,
}
