use crate::model::{NewTransaction, Period, Transaction};
use crate::services::{MonthlyDashboardMetricsSynchronizer, MonthlySummarySynchronizer};
use crate::store::TransactionStore;
use crate::Result;
use anyhow::ensure;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Creates a batch of transactions and refreshes the aggregates of every month they touch.
#[derive(Clone)]
pub struct TransactionRecorder {
    transactions: Arc<dyn TransactionStore>,
    summaries: MonthlySummarySynchronizer,
    metrics: MonthlyDashboardMetricsSynchronizer,
}

impl TransactionRecorder {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        summaries: MonthlySummarySynchronizer,
        metrics: MonthlyDashboardMetricsSynchronizer,
    ) -> Self {
        Self {
            transactions,
            summaries,
            metrics,
        }
    }

    /// Creates `batch` in order, then syncs the summary and metrics of each affected month.
    ///
    /// The whole batch is validated before anything is written. A failure while creating leaves
    /// the transactions created so far in place and skips the aggregate refresh.
    pub async fn record(&self, batch: Vec<NewTransaction>) -> Result<Vec<Transaction>> {
        ensure!(!batch.is_empty(), "No transactions to record");
        for transaction in &batch {
            transaction.validate()?;
        }

        let mut created = Vec::with_capacity(batch.len());
        let mut periods = BTreeSet::new();
        for transaction in batch {
            let transaction = self.transactions.create(transaction).await?;
            debug!(
                "Created transaction {} on {}",
                transaction.id, transaction.payment_date
            );
            periods.insert(transaction.period()?);
            created.push(transaction);
        }

        for period in &periods {
            self.sync(period).await?;
        }
        info!(
            "Recorded {} transactions across {} months",
            created.len(),
            periods.len()
        );
        Ok(created)
    }

    async fn sync(&self, period: &Period) -> Result<()> {
        tokio::try_join!(self.summaries.sync(period), self.metrics.sync(period))?;
        Ok(())
    }
}
