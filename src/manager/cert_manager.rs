//! The credential fetch/retry/persist/renew loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::ca::CaClient;
use crate::config::CertManagerOptions;
use crate::errors::{MeshcredError, Result};
use crate::persist::{CertificateSink, DirectoryCertificateSink};

use super::retry::{FetchOperation, RetryBudget, RetryConfig};

/// Lower bound for the renewal sleep. Keeps a certificate authority that
/// hands out already-expiring leaves from turning the loop into a busy spin.
const DEFAULT_RENEWAL_FLOOR: Duration = Duration::from_secs(1);

/// Maintains the gateway's TLS identity against the control plane.
///
/// [`CertManager::manage`] owns the active phase: it fetches the active root
/// CA and a leaf certificate for the configured service, persists both
/// through the sink, and repeats ahead of the leaf's expiry until cancelled
/// or a retry budget runs out. [`CertManager::wait_for_write`] lets any
/// number of concurrent tasks block until the first successful write.
pub struct CertManager {
    service: String,
    client: Option<Arc<dyn CaClient>>,
    options: CertManagerOptions,
    retry_config: RetryConfig,
    renewal_floor: Duration,
    sink: Arc<dyn CertificateSink>,
    ready_tx: watch::Sender<bool>,
    ready_rx: watch::Receiver<bool>,
}

impl CertManager {
    /// Create a manager for the given service identity.
    ///
    /// `client` may be `None` for a manager that only demonstrates
    /// [`wait_for_write`](Self::wait_for_write) cancellation behavior;
    /// calling [`manage`](Self::manage) on such a manager is a
    /// configuration error.
    pub fn new(
        client: Option<Arc<dyn CaClient>>,
        service: impl Into<String>,
        options: CertManagerOptions,
    ) -> Self {
        let (ready_tx, ready_rx) = watch::channel(false);
        let sink: Arc<dyn CertificateSink> = Arc::new(DirectoryCertificateSink::new(&options));

        Self {
            service: service.into(),
            client,
            options,
            retry_config: RetryConfig::default(),
            renewal_floor: DEFAULT_RENEWAL_FLOOR,
            sink,
            ready_tx,
            ready_rx,
        }
    }

    /// Configure the delay between consecutive retries of one fetch kind.
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Configure the minimum renewal sleep.
    pub fn with_renewal_floor(mut self, floor: Duration) -> Self {
        self.renewal_floor = floor;
        self
    }

    /// Replace the persistence sink.
    ///
    /// The fetch/retry logic is unchanged by the substitution; tests install
    /// sinks that assert on the exact material received and count writes.
    pub fn with_sink(mut self, sink: Arc<dyn CertificateSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run the credential loop until cancelled or a retry budget runs out.
    ///
    /// Cancellation is expected shutdown and returns `Ok(())` from the next
    /// suspension point. Exhausting the consecutive-failure budget of any
    /// operation kind returns [`MeshcredError::RetriesExhausted`] naming the
    /// kind; the loop does not restart itself. Invoke at most once per
    /// manager.
    pub async fn manage(&self, shutdown: CancellationToken) -> Result<()> {
        let client = self.client.as_ref().ok_or_else(|| {
            MeshcredError::config("Certificate manager started without a CA client")
        })?;

        let mut root_budget = RetryBudget::new(FetchOperation::Root, self.options.tries);
        let mut leaf_budget = RetryBudget::new(FetchOperation::Leaf, self.options.tries);
        let mut persist_budget = RetryBudget::new(FetchOperation::Persist, self.options.tries);
        let mut initialized = false;

        info!(
            service = %self.service,
            directory = %self.options.directory.display(),
            tries = self.options.tries,
            "Starting certificate manager"
        );

        loop {
            let root = loop {
                if shutdown.is_cancelled() {
                    return self.stopped();
                }
                match client.fetch_active_root().await {
                    Ok(root) => {
                        root_budget.record_success();
                        break root;
                    }
                    Err(err) => {
                        if !self
                            .backoff_after_failure(&mut root_budget, err.into(), &shutdown)
                            .await?
                        {
                            return self.stopped();
                        }
                    }
                }
            };

            let leaf = loop {
                if shutdown.is_cancelled() {
                    return self.stopped();
                }
                match client.fetch_leaf(&self.service).await {
                    Ok(leaf) => {
                        leaf_budget.record_success();
                        break leaf;
                    }
                    Err(err) => {
                        if !self
                            .backoff_after_failure(&mut leaf_budget, err.into(), &shutdown)
                            .await?
                        {
                            return self.stopped();
                        }
                    }
                }
            };

            loop {
                if shutdown.is_cancelled() {
                    return self.stopped();
                }
                match self.sink.write(&root, &leaf).await {
                    Ok(()) => {
                        persist_budget.record_success();
                        break;
                    }
                    Err(err) => {
                        if !self
                            .backoff_after_failure(&mut persist_budget, err.into(), &shutdown)
                            .await?
                        {
                            return self.stopped();
                        }
                    }
                }
            }

            if !initialized {
                initialized = true;
                info!(
                    service = %self.service,
                    directory = %self.options.directory.display(),
                    "Initial gateway credentials written"
                );
            }
            self.ready_tx.send_replace(true);

            let delay = renewal_delay(leaf.valid_before, Utc::now(), self.renewal_floor);
            debug!(
                valid_before = %leaf.valid_before,
                renew_in_secs = delay.as_secs(),
                "Credentials persisted, sleeping until renewal"
            );
            if !self.sleep_or_shutdown(delay, &shutdown).await {
                return self.stopped();
            }
        }
    }

    /// Block until the first successful credential write.
    ///
    /// Returns `Ok(())` as soon as the readiness signal has fired (also
    /// when it fired before this call) and
    /// [`MeshcredError::WaitCancelled`] if the caller's token is cancelled
    /// first. Any number of tasks may wait concurrently; a caller's
    /// cancellation affects only that caller. Safe on a manager whose
    /// [`manage`](Self::manage) never ran.
    pub async fn wait_for_write(&self, shutdown: &CancellationToken) -> Result<()> {
        let mut ready = self.ready_rx.clone();
        tokio::select! {
            biased;
            changed = ready.wait_for(|written| *written) => changed
                .map(|_| ())
                .map_err(|_| MeshcredError::internal("Readiness signal dropped")),
            _ = shutdown.cancelled() => Err(MeshcredError::WaitCancelled),
        }
    }

    fn stopped(&self) -> Result<()> {
        info!(service = %self.service, "Certificate manager stopped");
        Ok(())
    }

    /// Record a failed attempt against `budget` and back off before the next
    /// try. Returns `Ok(false)` when the shutdown token fired during the
    /// backoff sleep, `Err` when the budget is exhausted.
    async fn backoff_after_failure(
        &self,
        budget: &mut RetryBudget,
        error: MeshcredError,
        shutdown: &CancellationToken,
    ) -> Result<bool> {
        let attempts = budget.record_failure();
        if budget.exhausted() {
            error!(
                operation = budget.operation().as_str(),
                attempts,
                error = %error,
                "Retry budget exhausted"
            );
            return Err(MeshcredError::RetriesExhausted {
                operation: budget.operation(),
                attempts,
                source: Some(Box::new(error)),
            });
        }

        let backoff = self.retry_config.backoff_for_attempt(attempts);
        warn!(
            operation = budget.operation().as_str(),
            attempts,
            backoff_ms = backoff.as_millis() as u64,
            error = %error,
            "Attempt failed, backing off before retry"
        );
        Ok(self.sleep_or_shutdown(backoff, shutdown).await)
    }

    /// Sleep for `delay`, waking early on shutdown. Returns `false` when the
    /// shutdown token fired.
    async fn sleep_or_shutdown(&self, delay: Duration, shutdown: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}

/// Compute the sleep before the next fetch cycle: half the leaf's remaining
/// validity, clamped below by `floor`. An already-expired leaf yields the
/// floor, never a negative or unbounded sleep.
fn renewal_delay(valid_before: DateTime<Utc>, now: DateTime<Utc>, floor: Duration) -> Duration {
    let remaining = valid_before.signed_duration_since(now).to_std().unwrap_or(Duration::ZERO);
    std::cmp::max(remaining / 2, floor)
}
