//! Monthly income and expense summaries.

use crate::model::{Period, Summary, SummaryItem, SummaryUpsertData, Transaction};
use crate::store::{SummaryStore, TransactionStore};
use crate::Result;
use rust_decimal::Decimal;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::debug;

/// Folds one month of transactions into a summary. Implementations must be pure.
pub trait SummaryCalculator: Send + Sync {
    fn calculate(&self, transactions: &[Transaction], period: &Period) -> SummaryUpsertData;
}

type Filter = Box<dyn Fn(&Transaction) -> bool + Send + Sync>;

/// Splits transactions into income and expense lists, newest first, and totals each list.
#[derive(Default)]
pub struct DefaultSummaryCalculator {
    filter: Option<Filter>,
}

impl DefaultSummaryCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only transactions for which `filter` returns true are summarized.
    pub fn with_filter<F>(filter: F) -> Self
    where
        F: Fn(&Transaction) -> bool + Send + Sync + 'static,
    {
        Self {
            filter: Some(Box::new(filter)),
        }
    }

    fn includes(&self, transaction: &Transaction) -> bool {
        self.filter.as_ref().map_or(true, |f| f(transaction))
    }
}

impl Debug for DefaultSummaryCalculator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultSummaryCalculator")
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl SummaryCalculator for DefaultSummaryCalculator {
    fn calculate(&self, transactions: &[Transaction], period: &Period) -> SummaryUpsertData {
        let mut included: Vec<&Transaction> =
            transactions.iter().filter(|t| self.includes(t)).collect();
        // Stable, so same-day transactions keep their input order
        included.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));

        let mut income_transactions = Vec::new();
        let mut expense_transactions = Vec::new();
        let mut income_total = Decimal::ZERO;
        let mut expense_total = Decimal::ZERO;

        for transaction in included {
            if transaction.is_income() {
                income_total += transaction.value;
                income_transactions.push(SummaryItem::from(transaction));
            } else {
                expense_total += transaction.value;
                expense_transactions.push(SummaryItem::from(transaction));
            }
        }

        SummaryUpsertData {
            user_id: period.user_id().to_string(),
            year: period.year(),
            month: period.month(),
            income_total,
            expense_total,
            balance: income_total - expense_total,
            income_transactions,
            expense_transactions,
        }
    }
}

/// Recomputes the summary of a month from its transactions and stores it.
#[derive(Clone)]
pub struct MonthlySummarySynchronizer {
    transactions: Arc<dyn TransactionStore>,
    summaries: Arc<dyn SummaryStore>,
    calculator: Arc<dyn SummaryCalculator>,
}

impl MonthlySummarySynchronizer {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        summaries: Arc<dyn SummaryStore>,
        calculator: Arc<dyn SummaryCalculator>,
    ) -> Self {
        Self {
            transactions,
            summaries,
            calculator,
        }
    }

    /// Reads the transactions of `period`, summarizes them and overwrites the stored summary.
    ///
    /// # Errors
    /// Errors from reading the transactions or writing the summary are returned as they are.
    pub async fn sync(&self, period: &Period) -> Result<Summary> {
        let transactions = self.transactions.get_by_month(period).await?;
        debug!(
            "Summarizing {} transactions of {} for {}",
            transactions.len(),
            period,
            period.user_id()
        );
        let data = self.calculator.calculate(&transactions, period);
        let summary = self.summaries.upsert(data).await?;
        debug!("Stored summary {}", summary.id);
        Ok(summary)
    }

    /// Returns the stored summary of `period`, computing and storing it first if there is none.
    pub async fn load_or_sync(&self, period: &Period) -> Result<Summary> {
        match self.summaries.get_by_month(period).await? {
            Some(summary) => Ok(summary),
            None => self.sync(period).await,
        }
    }

    /// Loads (or computes) the summaries of `periods`, in the same order.
    pub async fn history(&self, periods: &[Period]) -> Result<Vec<Summary>> {
        let mut summaries = Vec::with_capacity(periods.len());
        for period in periods {
            summaries.push(self.load_or_sync(period).await?);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Origin, PaymentStatus};
    use crate::store::MemoryStore;
    use crate::test::{failing_store, transaction};
    use std::time::Duration;

    fn period() -> Period {
        Period::new("user-1", 2025, 3).unwrap()
    }

    fn sample() -> Vec<Transaction> {
        vec![
            transaction("a", Origin::Expense, "Nubank", "100.00", (2025, 3, 5)),
            transaction("b", Origin::Income, "Itaú", "3500.00", (2025, 3, 1)),
            transaction("c", Origin::Expense, "Itaú", "49.90", (2025, 3, 20)),
            transaction("d", Origin::Income, "Itaú", "250.10", (2025, 3, 28)),
            transaction("e", Origin::Expense, "Nubank", "12.35", (2025, 3, 20)),
        ]
    }

    fn ids(items: &[SummaryItem]) -> Vec<&str> {
        items.iter().map(|i| i.transaction_id.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let data = DefaultSummaryCalculator::new().calculate(&[], &period());
        assert_eq!(data.income_total, Decimal::ZERO);
        assert_eq!(data.expense_total, Decimal::ZERO);
        assert_eq!(data.balance, Decimal::ZERO);
        assert!(data.income_transactions.is_empty());
        assert!(data.expense_transactions.is_empty());
        assert_eq!(data.document_id(), "user-1_2025-03");
    }

    #[test]
    fn test_totals_and_balance() {
        let data = DefaultSummaryCalculator::new().calculate(&sample(), &period());
        assert_eq!(data.income_total, Decimal::new(375010, 2));
        assert_eq!(data.expense_total, Decimal::new(16225, 2));
        assert_eq!(data.balance, data.income_total - data.expense_total);

        let income_sum: Decimal = data.income_transactions.iter().map(|i| i.value).sum();
        let expense_sum: Decimal = data.expense_transactions.iter().map(|i| i.value).sum();
        assert_eq!(income_sum, data.income_total);
        assert_eq!(expense_sum, data.expense_total);
    }

    #[test]
    fn test_items_sorted_newest_first() {
        let data = DefaultSummaryCalculator::new().calculate(&sample(), &period());
        assert_eq!(ids(&data.income_transactions), vec!["d", "b"]);
        // c and e share a date and keep their input order
        assert_eq!(ids(&data.expense_transactions), vec!["c", "e", "a"]);
    }

    #[test]
    fn test_item_copies_status() {
        let mut transactions = sample();
        transactions[0].payment_status = PaymentStatus::Pending;
        let data = DefaultSummaryCalculator::new().calculate(&transactions, &period());
        let item = data
            .expense_transactions
            .iter()
            .find(|i| i.transaction_id == "a")
            .unwrap();
        assert_eq!(item.payment_status, PaymentStatus::Pending);
        assert_eq!(item.label, "a");
    }

    #[test]
    fn test_filter_excludes_transactions() {
        let calculator =
            DefaultSummaryCalculator::with_filter(|t| t.payment_status != PaymentStatus::Canceled);
        let mut transactions = sample();
        transactions[2].payment_status = PaymentStatus::Canceled;
        let data = calculator.calculate(&transactions, &period());
        assert_eq!(ids(&data.expense_transactions), vec!["e", "a"]);
        assert_eq!(data.expense_total, Decimal::new(11235, 2));
    }

    #[test]
    fn test_calculate_is_repeatable() {
        let calculator = DefaultSummaryCalculator::new();
        let transactions = sample();
        assert_eq!(
            calculator.calculate(&transactions, &period()),
            calculator.calculate(&transactions, &period())
        );
    }

    fn synchronizer(store: Arc<MemoryStore>) -> MonthlySummarySynchronizer {
        MonthlySummarySynchronizer::new(
            store.clone(),
            store,
            Arc::new(DefaultSummaryCalculator::new()),
        )
    }

    #[tokio::test]
    async fn test_sync_twice_keeps_created_at() {
        let store = Arc::new(MemoryStore::new());
        crate::test::seed(store.as_ref(), "user-1").await;
        let sync = synchronizer(store.clone());

        let first = sync.sync(&period()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = sync.sync(&period()).await.unwrap();

        assert_eq!(first.id, "user-1_2025-03");
        assert_eq!(first.data, second.data);
        assert_eq!(first.created_at, second.created_at);
        assert!(second.updated_at > first.updated_at);
    }

    #[tokio::test]
    async fn test_load_or_sync_uses_stored_summary() {
        let store = Arc::new(MemoryStore::new());
        let sync = synchronizer(store.clone());

        // Nothing stored yet, so the empty month is computed and stored
        let empty = sync.load_or_sync(&period()).await.unwrap();
        assert_eq!(empty.expense_total(), Decimal::ZERO);

        // New transactions are not visible until the next sync
        crate::test::seed(store.as_ref(), "user-1").await;
        let cached = sync.load_or_sync(&period()).await.unwrap();
        assert_eq!(cached, empty);

        let fresh = sync.sync(&period()).await.unwrap();
        assert!(fresh.expense_total() > Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_history_keeps_order() {
        let store = Arc::new(MemoryStore::new());
        crate::test::seed(store.as_ref(), "user-1").await;
        let sync = synchronizer(store);
        let periods = period().trailing(3).unwrap();
        let history = sync.history(&periods).await.unwrap();
        let months: Vec<u32> = history.iter().map(|s| s.data.month).collect();
        assert_eq!(months, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_sync_propagates_read_error() {
        let store = Arc::new(MemoryStore::new());
        let sync = MonthlySummarySynchronizer::new(
            failing_store(),
            store.clone(),
            Arc::new(DefaultSummaryCalculator::new()),
        );
        let err = sync.sync(&period()).await.unwrap_err();
        assert_eq!(err.to_string(), crate::test::READ_FAILURE);
        assert!(SummaryStore::get_by_month(store.as_ref(), &period())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_sync_propagates_write_error() {
        let store = Arc::new(MemoryStore::new());
        let sync = MonthlySummarySynchronizer::new(
            store,
            failing_store(),
            Arc::new(DefaultSummaryCalculator::new()),
        );
        let err = sync.sync(&period()).await.unwrap_err();
        assert_eq!(err.to_string(), crate::test::WRITE_FAILURE);
    }
}
