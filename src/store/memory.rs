//! Implements the store traits using in-memory data.
//!
//! This is compiled into the library, not only into tests, so that the services can be used
//! without a database.

use crate::model::{
    DashboardMetrics, DashboardMetricsUpsertData, Member, NewMember, NewTransaction, Period,
    Summary, SummaryUpsertData, Transaction,
};
use crate::store::{DashboardMetricsStore, MemberStore, SummaryStore, TransactionStore};
use crate::{utils, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Holds every record in memory. Aggregate documents are keyed by their document id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    transactions: Vec<Transaction>,
    members: Vec<Member>,
    summaries: HashMap<String, Summary>,
    metrics: HashMap<String, DashboardMetrics>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transactions held, for all users.
    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }
}

#[async_trait::async_trait]
impl TransactionStore for MemoryStore {
    async fn create(&self, transaction: NewTransaction) -> Result<Transaction> {
        transaction.validate()?;
        let created = Transaction::from_new(transaction, utils::generate_id(), utils::now());
        self.state.lock().await.transactions.push(created.clone());
        Ok(created)
    }

    async fn get_all(&self, user_id: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .state
            .lock()
            .await
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .state
            .lock()
            .await
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && t.payment_date >= start && t.payment_date <= end)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl MemberStore for MemoryStore {
    async fn create(&self, member: NewMember) -> Result<Member> {
        member.validate()?;
        let now = utils::now();
        let created = Member {
            id: utils::generate_id(),
            user_id: member.user_id,
            name: member.name,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.members.push(created.clone());
        Ok(created)
    }

    async fn get(&self, user_id: &str, id: &str) -> Result<Option<Member>> {
        Ok(self
            .state
            .lock()
            .await
            .members
            .iter()
            .find(|m| m.user_id == user_id && m.id == id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Member>> {
        Ok(self
            .state
            .lock()
            .await
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl SummaryStore for MemoryStore {
    async fn get_by_month(&self, period: &Period) -> Result<Option<Summary>> {
        Ok(self
            .state
            .lock()
            .await
            .summaries
            .get(&period.document_id())
            .cloned())
    }

    async fn upsert(&self, data: SummaryUpsertData) -> Result<Summary> {
        let id = data.document_id();
        let now = utils::now();
        let mut state = self.state.lock().await;
        let created_at = state
            .summaries
            .get(&id)
            .map(|existing| existing.created_at)
            .unwrap_or(now);
        let summary = Summary {
            id: id.clone(),
            data,
            created_at,
            updated_at: now,
        };
        state.summaries.insert(id, summary.clone());
        Ok(summary)
    }
}

#[async_trait::async_trait]
impl DashboardMetricsStore for MemoryStore {
    async fn get_by_month(&self, period: &Period) -> Result<Option<DashboardMetrics>> {
        Ok(self
            .state
            .lock()
            .await
            .metrics
            .get(&period.document_id())
            .cloned())
    }

    async fn upsert(&self, data: DashboardMetricsUpsertData) -> Result<DashboardMetrics> {
        let id = data.document_id();
        let now = utils::now();
        let mut state = self.state.lock().await;
        let created_at = state
            .metrics
            .get(&id)
            .map(|existing| existing.created_at)
            .unwrap_or(now);
        let metrics = DashboardMetrics {
            id: id.clone(),
            data,
            created_at,
            updated_at: now,
        };
        state.metrics.insert(id, metrics.clone());
        Ok(metrics)
    }
}
