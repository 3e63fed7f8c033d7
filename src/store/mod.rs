//! The persistence contracts used by the services. The SQLite database implements all of them, and
//! `MemoryStore` implements them in memory.

mod memory;

use crate::model::{
    DashboardMetrics, DashboardMetricsUpsertData, Member, NewMember, NewTransaction, Period,
    Summary, SummaryUpsertData, Transaction,
};
use crate::Result;
use chrono::NaiveDate;

pub use memory::MemoryStore;

#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists `transaction`, assigning its id and timestamps.
    async fn create(&self, transaction: NewTransaction) -> Result<Transaction>;

    /// All transactions of `user_id`, unordered.
    async fn get_all(&self, user_id: &str) -> Result<Vec<Transaction>>;

    /// Transactions of `user_id` paid between `start` and `end`, both inclusive, unordered.
    async fn get_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>>;

    /// Transactions paid within the calendar month of `period`, unordered.
    async fn get_by_month(&self, period: &Period) -> Result<Vec<Transaction>> {
        self.get_by_date_range(period.user_id(), period.first_day(), period.last_day())
            .await
    }
}

#[async_trait::async_trait]
pub trait MemberStore: Send + Sync {
    async fn create(&self, member: NewMember) -> Result<Member>;

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Member>>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Member>>;
}

#[async_trait::async_trait]
pub trait SummaryStore: Send + Sync {
    async fn get_by_month(&self, period: &Period) -> Result<Option<Summary>>;

    /// Writes the single summary of the user and month in `data`, replacing any previous one.
    /// `created_at` is kept from the first write and `updated_at` is refreshed.
    async fn upsert(&self, data: SummaryUpsertData) -> Result<Summary>;
}

#[async_trait::async_trait]
pub trait DashboardMetricsStore: Send + Sync {
    async fn get_by_month(&self, period: &Period) -> Result<Option<DashboardMetrics>>;

    /// Writes the single metrics document of the user and month in `data`, replacing any previous
    /// one. `created_at` is kept from the first write and `updated_at` is refreshed.
    async fn upsert(&self, data: DashboardMetricsUpsertData) -> Result<DashboardMetrics>;
}
