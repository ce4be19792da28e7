//! Spec run model representing one normalized test outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Tag;

/// Normalized execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecStatus {
    Passed,
    Failed,
    Skipped,
    Pending,
    Unknown,
}

impl SpecStatus {
    /// Normalize a native status string onto the reporting vocabulary.
    ///
    /// Total over any input: unrecognized literals map to `Unknown`.
    pub fn normalize(s: &str) -> Self {
        match s {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "skipped" | "pending" | "disabled" => Self::Skipped,
            "todo" => Self::Pending,
            other => {
                warn!("Unrecognized native test status: {}", other);
                Self::Unknown
            }
        }
    }

    /// String representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SpecStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One normalized test outcome within a suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecRun {
    /// 1-based sequence number within the parent suite run
    pub id: i64,
    /// Parent suite run id
    pub suite_id: i64,
    /// `>`-joined ancestor titles plus the spec's own title
    pub spec_description: String,
    /// Normalized status
    pub status: SpecStatus,
    /// Failure text; empty unless the spec failed
    pub message: String,
    /// Extracted category tags, never empty
    pub tags: Vec<Tag>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
