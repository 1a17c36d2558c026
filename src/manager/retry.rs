//! Retry accounting for the credential loop.

use std::time::Duration;

/// The independently retried operation kinds of one credential cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchOperation {
    /// Fetching the active root CA certificate
    Root,
    /// Fetching the leaf certificate for the service identity
    Leaf,
    /// Writing the credential pair through the persistence sink
    Persist,
}

impl FetchOperation {
    /// Returns the string representation of the operation kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root CA fetch",
            Self::Leaf => "leaf certificate fetch",
            Self::Persist => "credential persistence",
        }
    }
}

impl std::fmt::Display for FetchOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for the delay between consecutive retries of one kind.
///
/// The delay grows exponentially with the consecutive-failure count and is
/// capped. Tests set all durations to zero to run the loop at full speed.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Backoff before the first retry
    pub initial_backoff: Duration,
    /// Cap for exponential growth
    pub max_backoff: Duration,
    /// Multiplier applied per additional consecutive failure
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Calculate the backoff for a given consecutive-failure count (1-based).
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let multiplier = self.backoff_multiplier.powi(attempt as i32 - 1);
        let backoff_ms = self.initial_backoff.as_millis() as f64 * multiplier;
        let capped_ms = backoff_ms.min(self.max_backoff.as_millis() as f64);

        Duration::from_millis(capped_ms as u64)
    }

    /// A zero-delay configuration, for tests that drive many retries.
    pub fn immediate() -> Self {
        Self {
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }
}

/// Consecutive-failure counter for one [`FetchOperation`].
///
/// Each kind owns its budget: failures of one kind never advance another
/// kind's counter, and only a success of the same kind resets it. The budget
/// is exhausted once `failures >= tries`, so `tries = N` tolerates `N - 1`
/// consecutive failures and `tries = 0` is exhausted by the first failure.
#[derive(Debug)]
pub struct RetryBudget {
    operation: FetchOperation,
    tries: u32,
    failures: u32,
}

impl RetryBudget {
    /// Create a fresh budget for one operation kind.
    pub fn new(operation: FetchOperation, tries: u32) -> Self {
        Self { operation, tries, failures: 0 }
    }

    /// The operation kind this budget tracks.
    pub fn operation(&self) -> FetchOperation {
        self.operation
    }

    /// Current consecutive-failure count.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Record a success, resetting this kind's counter.
    pub fn record_success(&mut self) {
        self.failures = 0;
    }

    /// Record a failure and return the new consecutive-failure count.
    pub fn record_failure(&mut self) -> u32 {
        self.failures += 1;
        self.failures
    }

    /// Whether the consecutive-failure budget has been used up.
    pub fn exhausted(&self) -> bool {
        self.failures >= self.tries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_tolerates_tries_minus_one_failures() {
        let mut budget = RetryBudget::new(FetchOperation::Leaf, 3);
        budget.record_failure();
        budget.record_failure();
        assert!(!budget.exhausted());

        budget.record_failure();
        assert!(budget.exhausted());
        assert_eq!(budget.failures(), 3);
    }

    #[test]
    fn test_budget_resets_on_success() {
        let mut budget = RetryBudget::new(FetchOperation::Root, 2);
        budget.record_failure();
        budget.record_success();
        budget.record_failure();
        assert!(!budget.exhausted());
    }

    #[test]
    fn test_zero_tries_fails_immediately() {
        let mut budget = RetryBudget::new(FetchOperation::Persist, 0);
        assert_eq!(budget.record_failure(), 1);
        assert!(budget.exhausted());
    }

    #[test]
    fn test_backoff_growth_and_cap() {
        let config = RetryConfig {
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(500),
            backoff_multiplier: 2.0,
        };

        assert_eq!(config.backoff_for_attempt(0), Duration::ZERO);
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.backoff_for_attempt(3), Duration::from_millis(400));
        assert_eq!(config.backoff_for_attempt(4), Duration::from_millis(500));
        assert_eq!(config.backoff_for_attempt(10), Duration::from_millis(500));
    }

    #[test]
    fn test_immediate_config_is_all_zero() {
        let config = RetryConfig::immediate();
        for attempt in 0..5 {
            assert_eq!(config.backoff_for_attempt(attempt), Duration::ZERO);
        }
    }

    #[test]
    fn test_fetch_operation_display() {
        assert_eq!(FetchOperation::Root.to_string(), "root CA fetch");
        assert_eq!(FetchOperation::Leaf.to_string(), "leaf certificate fetch");
        assert_eq!(FetchOperation::Persist.to_string(), "credential persistence");
    }
}
