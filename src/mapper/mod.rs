//! Mapping from the runner's native aggregated result onto the reporting
//! schema.
//!
//! Pure transformation: no I/O, no retries, total over any structurally
//! valid input. The only non-determinism is the clock-derived run id/seed
//! and the wall-clock end-time capture.

pub mod tags;

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::path::Path;

use crate::models::{
    AggregateResult, AssertionResult, CLIENT_TYPE, SpecRun, SpecStatus, SuiteResult, SuiteRun, Tag,
    TestRun,
};
use crate::providers::{CiInfo, GitInfo};

/// Tag substituted when a test carries no category markers at all.
const DEFAULT_TAG: &str = "default";

/// Fallback message for a failed test with no failure material.
const FALLBACK_FAILURE_MESSAGE: &str = "Test failed";

/// Map one native aggregated result into a `TestRun`.
///
/// Suites are mapped in native order with sequential 1-based ids. The run
/// id and seed share one clock-derived value; `end_time` is captured when
/// mapping completes, since the native result does not report one.
pub fn map_aggregate(
    agg: &AggregateResult,
    project_id: &str,
    project_name: &str,
    git: &GitInfo,
    ci: &CiInfo,
) -> TestRun {
    let run_id = run_id_from_clock();

    let suite_runs = agg
        .test_results
        .iter()
        .enumerate()
        .map(|(idx, suite)| map_suite(suite, run_id, idx as i64 + 1))
        .collect();

    TestRun {
        id: run_id,
        test_project_name: project_name.to_string(),
        test_project_id: project_id.to_string(),
        test_seed: run_id,
        start_time: epoch_ms_to_utc(agg.start_time),
        end_time: Utc::now(),
        git_branch: git.branch.clone(),
        git_sha: git.sha.clone(),
        build_trigger_actor: ci.actor.clone(),
        build_url: ci.build_url.clone(),
        client_type: CLIENT_TYPE.to_string(),
        suite_runs,
    }
}

/// Map one native suite (test file) into a `SuiteRun`.
///
/// Start/end instants default to "now" when the native result omits them.
pub fn map_suite(suite: &SuiteResult, test_run_id: i64, sequence_number: i64) -> SuiteRun {
    let start_time = suite
        .start_time
        .map(epoch_ms_to_utc)
        .unwrap_or_else(Utc::now);
    let end_time = suite.end_time.map(epoch_ms_to_utc).unwrap_or_else(Utc::now);

    let spec_runs = suite
        .test_results
        .iter()
        .enumerate()
        .map(|(idx, test)| map_test(test, start_time, sequence_number, idx as i64 + 1))
        .collect();

    SuiteRun {
        id: sequence_number,
        test_run_id,
        suite_name: extract_suite_name(&suite.test_file_path),
        start_time,
        end_time,
        spec_runs,
    }
}

/// Map one native test outcome into a `SpecRun`.
pub fn map_test(
    test: &AssertionResult,
    suite_start: DateTime<Utc>,
    suite_id: i64,
    sequence_number: i64,
) -> SpecRun {
    let status = SpecStatus::normalize(&test.status);
    // Clamped so end_time can never precede start_time.
    let duration_ms = test.duration.unwrap_or(0).max(0);

    SpecRun {
        id: sequence_number,
        suite_id,
        spec_description: build_description(test),
        status,
        message: failure_message(test, status),
        tags: collect_tags(test),
        start_time: suite_start,
        end_time: suite_start
            .checked_add_signed(Duration::milliseconds(duration_ms))
            .unwrap_or(suite_start),
    }
}

/// Derive a suite name from the test file path.
///
/// Takes the final path segment and strips a trailing `.test.<ext>` or
/// `.spec.<ext>` suffix for ext in {js, ts, jsx, tsx}; anything else is kept
/// verbatim.
pub fn extract_suite_name(file_path: &str) -> String {
    let file_name = Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string());

    for kind in ["test", "spec"] {
        for ext in ["js", "ts", "jsx", "tsx"] {
            if let Some(stripped) = file_name.strip_suffix(&format!(".{}.{}", kind, ext)) {
                return stripped.to_string();
            }
        }
    }

    file_name
}

/// Join ancestor titles and the test's own title with `" > "`.
fn build_description(test: &AssertionResult) -> String {
    if test.ancestor_titles.is_empty() {
        test.title.clone()
    } else {
        format!("{} > {}", test.ancestor_titles.join(" > "), test.title)
    }
}

/// Compose the failure message for a mapped spec.
///
/// Empty unless the test failed; raw failure messages joined with newlines,
/// else the first structured detail message, else a fixed fallback.
fn failure_message(test: &AssertionResult, status: SpecStatus) -> String {
    if status != SpecStatus::Failed {
        return String::new();
    }

    if !test.failure_messages.is_empty() {
        return test.failure_messages.join("\n");
    }

    test.failure_details
        .iter()
        .find_map(|d| d.message.clone())
        .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string())
}

/// Extract tags from the test's own title, then each ancestor title in
/// order; deduplicate by name (first occurrence wins) and assign dense
/// 1-based ids. An empty result is replaced by the default tag.
fn collect_tags(test: &AssertionResult) -> Vec<Tag> {
    let mut names = tags::extract_tags(&test.title);
    for ancestor in &test.ancestor_titles {
        names.extend(tags::extract_tags(ancestor));
    }

    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }

    if seen.is_empty() {
        return vec![Tag::new(1, DEFAULT_TAG)];
    }

    seen.into_iter()
        .enumerate()
        .map(|(idx, name)| Tag::new(idx as i64 + 1, name))
        .collect()
}

/// Clock-derived run id: epoch milliseconds scaled to nanoseconds plus the
/// sub-millisecond component, i.e. nanoseconds since the epoch.
fn run_id_from_clock() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_millis().saturating_mul(1_000_000))
}

/// Convert an epoch-millisecond instant, falling back to now when the value
/// is out of range.
fn epoch_ms_to_utc(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FailureDetail;

    fn passed_test(title: &str, ancestors: &[&str]) -> AssertionResult {
        AssertionResult {
            ancestor_titles: ancestors.iter().map(|s| s.to_string()).collect(),
            title: title.to_string(),
            status: "passed".to_string(),
            duration: None,
            failure_messages: vec![],
            failure_details: vec![],
        }
    }

    #[test]
    fn test_description_joins_ancestors() {
        let spec = map_test(&passed_test("C", &["A", "B"]), Utc::now(), 1, 1);
        assert_eq!(spec.spec_description, "A > B > C");
    }

    #[test]
    fn test_description_without_ancestors() {
        let spec = map_test(&passed_test("C", &[]), Utc::now(), 1, 1);
        assert_eq!(spec.spec_description, "C");
    }

    #[test]
    fn test_tags_deduplicated_first_wins() {
        let spec = map_test(
            &passed_test("adds @fast", &["Calc @fast [unit]"]),
            Utc::now(),
            1,
            1,
        );
        assert_eq!(
            spec.tags,
            vec![Tag::new(1, "fast"), Tag::new(2, "unit")]
        );
    }

    #[test]
    fn test_default_tag_when_no_markers() {
        let spec = map_test(&passed_test("adds", &["Calc"]), Utc::now(), 1, 1);
        assert_eq!(spec.tags, vec![Tag::new(1, "default")]);
    }

    #[test]
    fn test_title_tags_precede_ancestor_tags() {
        let spec = map_test(&passed_test("adds #own", &["Calc @outer"]), Utc::now(), 1, 1);
        assert_eq!(spec.tags, vec![Tag::new(1, "own"), Tag::new(2, "outer")]);
    }

    #[test]
    fn test_failed_message_joins_failure_messages() {
        let mut test = passed_test("divides", &[]);
        test.status = "failed".to_string();
        test.failure_messages = vec!["E1".to_string(), "E2".to_string()];

        let spec = map_test(&test, Utc::now(), 1, 1);
        assert_eq!(spec.message, "E1\nE2");
    }

    #[test]
    fn test_failed_message_falls_back_to_detail() {
        let mut test = passed_test("divides", &[]);
        test.status = "failed".to_string();
        test.failure_details = vec![
            FailureDetail {
                message: None,
                stack: Some("at calc.ts:10".to_string()),
            },
            FailureDetail {
                message: Some("division by zero".to_string()),
                stack: None,
            },
        ];

        let spec = map_test(&test, Utc::now(), 1, 1);
        assert_eq!(spec.message, "division by zero");
    }

    #[test]
    fn test_failed_message_fixed_fallback() {
        let mut test = passed_test("divides", &[]);
        test.status = "failed".to_string();

        let spec = map_test(&test, Utc::now(), 1, 1);
        assert_eq!(spec.message, "Test failed");
    }

    #[test]
    fn test_passed_message_is_empty() {
        let mut test = passed_test("adds", &[]);
        test.failure_messages = vec!["stale".to_string()];

        let spec = map_test(&test, Utc::now(), 1, 1);
        assert_eq!(spec.message, "");
    }

    #[test]
    fn test_spec_times_follow_duration() {
        let start = Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap();
        let mut test = passed_test("adds", &[]);
        test.duration = Some(250);

        let spec = map_test(&test, start, 1, 1);
        assert_eq!(spec.start_time, start);
        assert_eq!(spec.end_time, start + Duration::milliseconds(250));
    }

    #[test]
    fn test_missing_duration_defaults_to_zero() {
        let start = Utc::now();
        let spec = map_test(&passed_test("adds", &[]), start, 1, 1);
        assert_eq!(spec.end_time, spec.start_time);
    }

    #[test]
    fn test_extract_suite_name_strips_suffixes() {
        assert_eq!(extract_suite_name("/a/b/calculator.test.ts"), "calculator");
        assert_eq!(extract_suite_name("/a/b/util.spec.js"), "util");
        assert_eq!(extract_suite_name("widgets.test.tsx"), "widgets");
        assert_eq!(extract_suite_name("/x/list.spec.jsx"), "list");
    }

    #[test]
    fn test_extract_suite_name_keeps_other_names() {
        assert_eq!(extract_suite_name("/a/b/helpers.js"), "helpers.js");
        assert_eq!(extract_suite_name("/a/b/calculator.rs"), "calculator.rs");
    }

    #[test]
    fn test_map_suite_assigns_sequential_spec_ids() {
        let suite = SuiteResult {
            test_file_path: "/x/calc.test.ts".to_string(),
            start_time: Some(1_700_000_000_000),
            end_time: Some(1_700_000_001_000),
            test_results: vec![
                passed_test("adds", &[]),
                passed_test("subtracts", &[]),
                passed_test("divides", &[]),
            ],
        };

        let mapped = map_suite(&suite, 99, 2);
        assert_eq!(mapped.id, 2);
        assert_eq!(mapped.test_run_id, 99);
        assert_eq!(mapped.suite_name, "calc");
        let ids: Vec<i64> = mapped.spec_runs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(mapped.spec_runs.iter().all(|s| s.suite_id == 2));
    }

    #[test]
    fn test_map_aggregate_end_to_end() {
        let agg = AggregateResult {
            start_time: 1_700_000_000_000,
            test_results: vec![SuiteResult {
                test_file_path: "/x/calc.test.ts".to_string(),
                start_time: Some(1_700_000_000_000),
                end_time: Some(1_700_000_000_500),
                test_results: vec![{
                    let mut t = passed_test("adds [unit]", &["Calc"]);
                    t.duration = Some(5);
                    t
                }],
            }],
        };

        let git = GitInfo {
            branch: "main".to_string(),
            sha: "abc123".to_string(),
        };
        let ci = CiInfo::local();

        let run = map_aggregate(&agg, "proj-1", "Project One", &git, &ci);

        assert_eq!(run.test_project_id, "proj-1");
        assert_eq!(run.test_project_name, "Project One");
        assert_eq!(run.id, run.test_seed);
        assert_eq!(run.git_branch, "main");
        assert_eq!(run.client_type, CLIENT_TYPE);
        assert_eq!(run.suite_runs.len(), 1);

        let suite = &run.suite_runs[0];
        assert_eq!(suite.suite_name, "calc");
        assert_eq!(suite.test_run_id, run.id);

        let spec = &suite.spec_runs[0];
        assert_eq!(spec.spec_description, "Calc > adds [unit]");
        assert_eq!(spec.status, SpecStatus::Passed);
        assert_eq!(spec.tags, vec![Tag::new(1, "unit")]);
        assert_eq!(spec.message, "");
        assert_eq!(
            spec.end_time,
            spec.start_time + Duration::milliseconds(5)
        );
    }

    #[test]
    fn test_map_aggregate_is_total_over_sparse_input() {
        let agg = AggregateResult {
            start_time: 0,
            test_results: vec![SuiteResult {
                test_file_path: String::new(),
                start_time: None,
                end_time: None,
                test_results: vec![AssertionResult {
                    ancestor_titles: vec![],
                    title: String::new(),
                    status: "exploded".to_string(),
                    duration: None,
                    failure_messages: vec![],
                    failure_details: vec![],
                }],
            }],
        };

        let run = map_aggregate(&agg, "p", "p", &GitInfo::unknown(), &CiInfo::local());
        let spec = &run.suite_runs[0].spec_runs[0];
        assert_eq!(spec.status, SpecStatus::Unknown);
        assert_eq!(spec.tags, vec![Tag::new(1, "default")]);
    }

    #[test]
    fn test_run_id_is_nanosecond_scale() {
        let id = run_id_from_clock();
        // Any date past 2001 exceeds 1e18 ns; a millisecond clock would not.
        assert!(id > 1_000_000_000_000_000_000);
    }
}
