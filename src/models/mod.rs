//! Domain models for the test run reporter.

pub mod native;
pub mod spec_run;
pub mod suite_run;
pub mod tag;
pub mod test_run;

// Re-export commonly used types
pub use native::{AggregateResult, AssertionResult, FailureDetail, SuiteResult};
pub use spec_run::{SpecRun, SpecStatus};
pub use suite_run::SuiteRun;
pub use tag::Tag;
pub use test_run::{CLIENT_TYPE, RunStats, TestRun};
