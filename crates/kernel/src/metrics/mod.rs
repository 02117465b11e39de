//! Prometheus metrics collection.
//!
//! Provides publishing outcome counters in Prometheus format.

use prometheus_client::encoding::{EncodeLabelSet, text::encode};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

/// Outcome label: the publish action on success, the failure kind otherwise.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OutcomeLabels {
    pub outcome: String,
}

/// Application metrics.
pub struct Metrics {
    registry: Registry,

    /// Submissions by outcome.
    pub submissions: Family<OutcomeLabels, Counter>,

    /// Deletions by outcome.
    pub deletions: Family<OutcomeLabels, Counter>,
}

impl Metrics {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let submissions = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "submissions",
            "Article submissions by outcome",
            submissions.clone(),
        );

        let deletions = Family::<OutcomeLabels, Counter>::default();
        registry.register(
            "deletions",
            "Article deletions by outcome",
            deletions.clone(),
        );

        Self {
            registry,
            submissions,
            deletions,
        }
    }

    /// Record a submission outcome.
    pub fn record_submission(&self, outcome: &str) {
        self.submissions
            .get_or_create(&OutcomeLabels {
                outcome: outcome.to_string(),
            })
            .inc();
    }

    /// Record a deletion outcome.
    pub fn record_deletion(&self, outcome: &str) {
        self.deletions
            .get_or_create(&OutcomeLabels {
                outcome: outcome.to_string(),
            })
            .inc();
    }

    /// Encode metrics in Prometheus text format.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        // Prometheus encoding to String buffer is infallible
        #[allow(clippy::expect_used)]
        encode(&mut buffer, &self.registry).expect("encoding metrics");
        buffer
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish()
    }
}
