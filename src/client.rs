//! HTTP transport to the collection server.
//!
//! Owns one reqwest client configured at construction (base URL, timeout,
//! static user-agent) and implements the report/health-check/retry
//! protocol. Retry is an explicit loop with an attempt counter and a
//! classified-error decision, not middleware, so the policy stays visible
//! and independently testable.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{DeliveryError, DeliveryResult};
use crate::models::TestRun;

/// Connect timeout, applied alongside the configured total timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request.
const USER_AGENT: &str = concat!("test-run-reporter/", env!("CARGO_PKG_VERSION"));

/// Acknowledgement returned by the collection server on a successful
/// report. The body is optional; an empty or unparseable 2xx body still
/// counts as success.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportReceipt {
    /// Remote-assigned run identifier, when the server returns one
    #[serde(default)]
    pub id: Option<i64>,
}

/// Client for the collection server's report and health endpoints.
pub struct TransportClient {
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl TransportClient {
    /// Build a client from resolved configuration.
    pub fn new(config: &Config) -> DeliveryResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DeliveryError::InvalidClient(e.to_string()))?;

        Ok(TransportClient {
            base_url: config.base_url.clone(),
            client,
            max_retries: config.max_retries,
            retry_base_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Deliver one mapped test run to `POST {base}/api/v1/test-runs`.
    ///
    /// Retries transient failures (no response, or 5xx) with linearly
    /// growing delays; client-class statuses fail immediately. Once
    /// attempts are exhausted the last error is surfaced.
    pub async fn report(&self, run: &TestRun) -> DeliveryResult<ReportReceipt> {
        let url = format!("{}/api/v1/test-runs", self.base_url);

        let receipt = send_with_retry(self.max_retries, self.retry_base_delay, |attempt| {
            debug!("Delivery attempt {} to {}", attempt, url);
            post_run(&self.client, &url, run)
        })
        .await?;

        info!(
            "Reported test run for project '{}' ({}): seed={}, branch={}, {} suites",
            run.test_project_name,
            run.test_project_id,
            run.test_seed,
            run.git_branch,
            run.suite_runs.len()
        );
        if let Some(remote_id) = receipt.id {
            info!("Collection server acknowledged run as id {}", remote_id);
        }

        Ok(receipt)
    }

    /// Probe `GET {base}/api/v1/health`.
    ///
    /// True iff a 2xx response arrives; every failure mode, network or
    /// otherwise, converts to `false`.
    pub async fn ping(&self) -> bool {
        let url = format!("{}/api/v1/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health probe failed: {}", e);
                false
            }
        }
    }
}

/// Issue one POST and classify the outcome.
async fn post_run(
    client: &reqwest::Client,
    url: &str,
    run: &TestRun,
) -> DeliveryResult<ReportReceipt> {
    let response = client.post(url).json(run).send().await?;

    let status = response.status();
    if status.is_success() {
        Ok(response.json::<ReportReceipt>().await.unwrap_or_default())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Explicit retry loop over an attempt closure.
///
/// `max_attempts` bounds total invocations; the delay before the Nth retry
/// is `base_delay × N` (linear, not exponential). The attempt counter is
/// scoped to this one logical request.
pub(crate) async fn send_with_retry<F, Fut, T>(
    max_attempts: u32,
    base_delay: Duration,
    mut attempt_fn: F,
) -> DeliveryResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = DeliveryResult<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match attempt_fn(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = base_delay * attempt;
                warn!(
                    "Delivery attempt {}/{} failed ({}), retrying in {:?}",
                    attempt, max_attempts, err, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}
