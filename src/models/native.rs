//! Runner-side result structs matching the aggregated JSON the test runner
//! emits on run completion.

use serde::Deserialize;

/// Root aggregated result for one completed run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    /// Run start time in epoch milliseconds
    #[serde(default)]
    pub start_time: i64,
    /// Per-file suite results
    #[serde(default)]
    pub test_results: Vec<SuiteResult>,
}

/// Results for a single test file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResult {
    /// Absolute path to the test file
    #[serde(default)]
    pub test_file_path: String,
    /// Suite start time in epoch milliseconds
    #[serde(default)]
    pub start_time: Option<i64>,
    /// Suite end time in epoch milliseconds
    #[serde(default)]
    pub end_time: Option<i64>,
    /// Individual test outcomes
    #[serde(default)]
    pub test_results: Vec<AssertionResult>,
}

/// Outcome of one individual test.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    /// Titles of the enclosing describe blocks, outermost first
    #[serde(default)]
    pub ancestor_titles: Vec<String>,
    /// The test's own title
    #[serde(default)]
    pub title: String,
    /// Native status string ("passed", "failed", "todo", ...)
    #[serde(default)]
    pub status: String,
    /// Duration in milliseconds
    #[serde(default)]
    pub duration: Option<i64>,
    /// Raw failure message strings
    #[serde(default)]
    pub failure_messages: Vec<String>,
    /// Structured failure details, when the runner provides them
    #[serde(default)]
    pub failure_details: Vec<FailureDetail>,
}

/// Structured failure detail attached to a failed test.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_minimal_aggregate() {
        let json = r#"{"startTime": 1700000000000, "testResults": []}"#;
        let agg: AggregateResult = serde_json::from_str(json).unwrap();
        assert_eq!(agg.start_time, 1_700_000_000_000);
        assert!(agg.test_results.is_empty());
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "startTime": 1,
            "testResults": [{
                "testFilePath": "/x/calc.test.ts",
                "testResults": [{"title": "adds", "status": "passed"}]
            }]
        }"#;
        let agg: AggregateResult = serde_json::from_str(json).unwrap();
        let suite = &agg.test_results[0];
        assert!(suite.start_time.is_none());
        assert!(suite.end_time.is_none());

        let test = &suite.test_results[0];
        assert!(test.ancestor_titles.is_empty());
        assert!(test.duration.is_none());
        assert!(test.failure_messages.is_empty());
        assert!(test.failure_details.is_empty());
    }

    #[test]
    fn test_parses_failure_details() {
        let json = r#"{
            "ancestorTitles": ["Calc"],
            "title": "divides",
            "status": "failed",
            "failureMessages": [],
            "failureDetails": [{"message": "division by zero", "stack": "at calc.ts:10"}]
        }"#;
        let test: AssertionResult = serde_json::from_str(json).unwrap();
        assert_eq!(
            test.failure_details[0].message.as_deref(),
            Some("division by zero")
        );
    }
}
