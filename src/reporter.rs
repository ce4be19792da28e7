//! Reporter adapter wiring the runner's run-complete event to the mapper
//! and transport client.

use tracing::{error, info};

use crate::client::TransportClient;
use crate::config::{Config, ReporterOptions};
use crate::error::{DeliveryError, DeliveryResult};
use crate::mapper;
use crate::models::{AggregateResult, RunStats, TestRun};
use crate::providers::{ci, git};

/// Callback invoked with the mapped run before delivery.
pub type PreReportHook = Box<dyn Fn(&TestRun) + Send + Sync>;

/// Callback invoked after delivery with the mapped run and the failure, if
/// any.
pub type PostReportHook = Box<dyn Fn(&TestRun, Option<&DeliveryError>) + Send + Sync>;

/// Glue between the host runner's lifecycle and the reporting core.
///
/// Constructed once per process; when reporting is disabled the adapter
/// becomes a no-op for every lifecycle call.
pub struct Reporter {
    config: Config,
    client: Option<TransportClient>,
    pre_report_hooks: Vec<PreReportHook>,
    post_report_hooks: Vec<PostReportHook>,
}

impl Reporter {
    /// Resolve configuration and build the adapter.
    pub fn new(options: &ReporterOptions) -> Self {
        let config = Config::resolve(options);

        let client = if config.enabled {
            match TransportClient::new(&config) {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("Could not build transport client: {}; reporting disabled", e);
                    None
                }
            }
        } else {
            info!("Test run reporting is disabled; results will not be uploaded");
            None
        };

        Reporter {
            config,
            client,
            pre_report_hooks: Vec::new(),
            post_report_hooks: Vec::new(),
        }
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether this adapter will attempt delivery.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Register a callback to run with the mapped run before delivery.
    /// Hooks run in registration order.
    pub fn add_pre_report_hook<F>(&mut self, hook: F)
    where
        F: Fn(&TestRun) + Send + Sync + 'static,
    {
        self.pre_report_hooks.push(Box::new(hook));
    }

    /// Register a callback to run after delivery, successful or not.
    /// Hooks run in registration order.
    pub fn add_post_report_hook<F>(&mut self, hook: F)
    where
        F: Fn(&TestRun, Option<&DeliveryError>) + Send + Sync + 'static,
    {
        self.post_report_hooks.push(Box::new(hook));
    }

    /// Handle the runner's run-complete event: gather metadata, map, and
    /// deliver.
    ///
    /// Delivery failure is logged and swallowed so the host run's outcome
    /// is unaffected, unless `fail_on_error` is configured.
    pub async fn on_run_complete(&self, result: &AggregateResult) -> DeliveryResult<()> {
        let Some(client) = &self.client else {
            return Ok(());
        };

        // The two lookups are independent; gather them concurrently.
        let (git_info, ci_info) = tokio::join!(git::resolve(), async { ci::detect() });

        let run = mapper::map_aggregate(
            result,
            &self.config.project_id,
            &self.config.project_name,
            &git_info,
            &ci_info,
        );

        log_summary(&run);

        for hook in &self.pre_report_hooks {
            hook(&run);
        }

        match client.report(&run).await {
            Ok(_) => {
                for hook in &self.post_report_hooks {
                    hook(&run, None);
                }
                Ok(())
            }
            Err(err) => {
                for hook in &self.post_report_hooks {
                    hook(&run, Some(&err));
                }
                error!("Failed to report test run: {}", err);
                if self.config.fail_on_error {
                    Err(err)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Fixed-format summary logged before transmission.
fn log_summary(run: &TestRun) {
    let stats = RunStats::of(run);
    let short_sha = run.git_sha.get(..8).unwrap_or(&run.git_sha);

    info!("Uploading test run for project '{}'", run.test_project_id);
    info!("  branch: {} @ {}", run.git_branch, short_sha);
    info!("  suites: {}", run.suite_runs.len());
    info!("  specs:  {}", stats);
}
