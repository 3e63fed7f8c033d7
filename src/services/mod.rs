//! Calculators that fold a month of transactions into aggregates, and the services that keep the
//! stored aggregates in step with the transactions.

mod keys;
mod metrics;
mod recorder;
mod summary;

pub use keys::sanitize_key;
pub use metrics::{
    DashboardMetricsCalculator, DefaultDashboardMetricsCalculator,
    MonthlyDashboardMetricsSynchronizer,
};
pub use recorder::TransactionRecorder;
pub use summary::{DefaultSummaryCalculator, MonthlySummarySynchronizer, SummaryCalculator};

use crate::store::{DashboardMetricsStore, MemberStore, SummaryStore, TransactionStore};
use std::sync::Arc;

/// Wires the synchronizers and the recorder to a single backing store using the default
/// calculators.
#[derive(Clone)]
pub struct Services {
    summaries: MonthlySummarySynchronizer,
    metrics: MonthlyDashboardMetricsSynchronizer,
    recorder: TransactionRecorder,
}

impl Services {
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: TransactionStore + MemberStore + SummaryStore + DashboardMetricsStore + 'static,
    {
        let summaries = MonthlySummarySynchronizer::new(
            store.clone(),
            store.clone(),
            Arc::new(DefaultSummaryCalculator::new()),
        );
        let metrics = MonthlyDashboardMetricsSynchronizer::new(
            store.clone(),
            store.clone(),
            Arc::new(DefaultDashboardMetricsCalculator::new()),
        );
        let recorder = TransactionRecorder::new(store, summaries.clone(), metrics.clone());
        Self {
            summaries,
            metrics,
            recorder,
        }
    }

    pub fn summaries(&self) -> &MonthlySummarySynchronizer {
        &self.summaries
    }

    pub fn metrics(&self) -> &MonthlyDashboardMetricsSynchronizer {
        &self.metrics
    }

    pub fn recorder(&self) -> &TransactionRecorder {
        &self.recorder
    }
}
