//! Per-bank and per-category expense totals for the dashboard.

use crate::model::{DashboardMetrics, DashboardMetricsUpsertData, MetricEntry, Period, Transaction};
use crate::services::sanitize_key;
use crate::store::{DashboardMetricsStore, TransactionStore};
use crate::Result;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const NO_BANK_LABEL: &str = "Sem banco";
const NO_BANK_KEY: &str = "sem-banco";
const NO_CATEGORY_LABEL: &str = "Sem categoria";
const NO_CATEGORY_KEY: &str = "sem-categoria";

/// Folds one month of transactions into dashboard metrics. Implementations must be pure.
pub trait DashboardMetricsCalculator: Send + Sync {
    fn calculate(&self, transactions: &[Transaction], period: &Period)
        -> DashboardMetricsUpsertData;
}

/// Sums positive expenses by bank and by category.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDashboardMetricsCalculator;

impl DefaultDashboardMetricsCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl DashboardMetricsCalculator for DefaultDashboardMetricsCalculator {
    fn calculate(
        &self,
        transactions: &[Transaction],
        period: &Period,
    ) -> DashboardMetricsUpsertData {
        let mut banks = Totals::default();
        let mut categories = Totals::default();

        for transaction in transactions
            .iter()
            .filter(|t| t.is_expense() && t.value > Decimal::ZERO)
        {
            let (key, label) = bank_key(&transaction.bank);
            banks.add(key, label, transaction.value);

            let (key, label) = match transaction.category {
                Some(category) => labelled(category.to_string(), NO_CATEGORY_KEY),
                None => (NO_CATEGORY_KEY.to_string(), NO_CATEGORY_LABEL.to_string()),
            };
            categories.add(key, label, transaction.value);
        }

        DashboardMetricsUpsertData {
            user_id: period.user_id().to_string(),
            year: period.year(),
            month: period.month(),
            bank_totals: banks.into_entries(),
            category_totals: categories.into_entries(),
        }
    }
}

fn bank_key(bank: &str) -> (String, String) {
    let label = bank.trim();
    if label.is_empty() {
        (NO_BANK_KEY.to_string(), NO_BANK_LABEL.to_string())
    } else {
        labelled(label.to_string(), NO_BANK_KEY)
    }
}

fn labelled(label: String, fallback_key: &str) -> (String, String) {
    let key = sanitize_key(&label);
    if key.is_empty() {
        (fallback_key.to_string(), label)
    } else {
        (key, label)
    }
}

/// Running totals keyed by sanitized key, remembering the first label seen for each key.
#[derive(Debug, Default)]
struct Totals {
    entries: HashMap<String, MetricEntry>,
}

impl Totals {
    fn add(&mut self, key: String, label: String, value: Decimal) {
        self.entries
            .entry(key)
            .or_insert_with_key(|key| MetricEntry::new(key.clone(), label, Decimal::ZERO))
            .total += value;
    }

    /// Largest total first, ties broken by key. Non-positive totals are dropped.
    fn into_entries(self) -> Vec<MetricEntry> {
        let mut entries: Vec<MetricEntry> = self
            .entries
            .into_values()
            .filter(|e| e.total > Decimal::ZERO)
            .collect();
        entries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
        entries
    }
}

/// Recomputes the dashboard metrics of a month from its transactions and stores them.
#[derive(Clone)]
pub struct MonthlyDashboardMetricsSynchronizer {
    transactions: Arc<dyn TransactionStore>,
    metrics: Arc<dyn DashboardMetricsStore>,
    calculator: Arc<dyn DashboardMetricsCalculator>,
}

impl MonthlyDashboardMetricsSynchronizer {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        metrics: Arc<dyn DashboardMetricsStore>,
        calculator: Arc<dyn DashboardMetricsCalculator>,
    ) -> Self {
        Self {
            transactions,
            metrics,
            calculator,
        }
    }

    /// Reads the transactions of `period`, computes the metrics and overwrites the stored ones.
    pub async fn sync(&self, period: &Period) -> Result<DashboardMetrics> {
        let transactions = self.transactions.get_by_month(period).await?;
        debug!(
            "Computing metrics from {} transactions of {} for {}",
            transactions.len(),
            period,
            period.user_id()
        );
        let data = self.calculator.calculate(&transactions, period);
        let metrics = self.metrics.upsert(data).await?;
        debug!("Stored dashboard metrics {}", metrics.id);
        Ok(metrics)
    }

    pub async fn load_or_sync(&self, period: &Period) -> Result<DashboardMetrics> {
        match self.metrics.get_by_month(period).await? {
            Some(metrics) => Ok(metrics),
            None => self.sync(period).await,
        }
    }
}
