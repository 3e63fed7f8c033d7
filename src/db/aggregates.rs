//! Storage of the monthly summary and dashboard metrics documents. Both are keyed by their
//! document id and their item lists are stored as JSON text.

use super::{decode_decimal, decode_time, encode_time, Db};
use crate::model::{
    DashboardMetrics, DashboardMetricsUpsertData, Period, Summary, SummaryUpsertData,
};
use crate::store::{DashboardMetricsStore, SummaryStore};
use crate::{utils, Result};
use anyhow::Context;

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: String,
    user_id: String,
    year: i64,
    month: i64,
    income_total: String,
    expense_total: String,
    balance: String,
    income_transactions: String,
    expense_transactions: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<SummaryRow> for Summary {
    type Error = anyhow::Error;

    fn try_from(row: SummaryRow) -> Result<Self> {
        let id = row.id;
        let decode = || -> Result<Summary> {
            Ok(Summary {
                id: id.clone(),
                data: SummaryUpsertData {
                    user_id: row.user_id,
                    year: i32::try_from(row.year)?,
                    month: u32::try_from(row.month)?,
                    income_total: decode_decimal(&row.income_total)?,
                    expense_total: decode_decimal(&row.expense_total)?,
                    balance: decode_decimal(&row.balance)?,
                    income_transactions: serde_json::from_str(&row.income_transactions)?,
                    expense_transactions: serde_json::from_str(&row.expense_transactions)?,
                },
                created_at: decode_time(&row.created_at)?,
                updated_at: decode_time(&row.updated_at)?,
            })
        };
        decode().with_context(|| format!("Unable to read summary {id}"))
    }
}

#[derive(sqlx::FromRow)]
struct MetricsRow {
    id: String,
    user_id: String,
    year: i64,
    month: i64,
    bank_totals: String,
    category_totals: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<MetricsRow> for DashboardMetrics {
    type Error = anyhow::Error;

    fn try_from(row: MetricsRow) -> Result<Self> {
        let id = row.id;
        let decode = || -> Result<DashboardMetrics> {
            Ok(DashboardMetrics {
                id: id.clone(),
                data: DashboardMetricsUpsertData {
                    user_id: row.user_id,
                    year: i32::try_from(row.year)?,
                    month: u32::try_from(row.month)?,
                    bank_totals: serde_json::from_str(&row.bank_totals)?,
                    category_totals: serde_json::from_str(&row.category_totals)?,
                },
                created_at: decode_time(&row.created_at)?,
                updated_at: decode_time(&row.updated_at)?,
            })
        };
        decode().with_context(|| format!("Unable to read dashboard metrics {id}"))
    }
}

const SELECT_SUMMARY: &str = r#"
SELECT id, user_id, year, month, income_total, expense_total, balance, income_transactions,
       expense_transactions, created_at, updated_at
FROM summaries
WHERE id = ?"#;

const SELECT_METRICS: &str = r#"
SELECT id, user_id, year, month, bank_totals, category_totals, created_at, updated_at
FROM dashboard_metrics
WHERE id = ?"#;

#[async_trait::async_trait]
impl SummaryStore for Db {
    async fn get_by_month(&self, period: &Period) -> Result<Option<Summary>> {
        let row: Option<SummaryRow> = sqlx::query_as(SELECT_SUMMARY)
            .bind(period.document_id())
            .fetch_optional(self.pool())
            .await
            .context("Failed to query summary")?;
        row.map(Summary::try_from).transpose()
    }

    async fn upsert(&self, data: SummaryUpsertData) -> Result<Summary> {
        let id = data.document_id();
        let now = encode_time(utils::now());
        let income_transactions = serde_json::to_string(&data.income_transactions)?;
        let expense_transactions = serde_json::to_string(&data.expense_transactions)?;

        let mut tx = self.pool().begin().await?;
        sqlx::query(
            r#"
INSERT INTO summaries (id, user_id, year, month, income_total, expense_total, balance,
                       income_transactions, expense_transactions, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (id) DO UPDATE SET
    income_total = excluded.income_total,
    expense_total = excluded.expense_total,
    balance = excluded.balance,
    income_transactions = excluded.income_transactions,
    expense_transactions = excluded.expense_transactions,
    updated_at = excluded.updated_at"#,
        )
        .bind(&id)
        .bind(&data.user_id)
        .bind(data.year)
        .bind(i64::from(data.month))
        .bind(data.income_total.to_string())
        .bind(data.expense_total.to_string())
        .bind(data.balance.to_string())
        .bind(income_transactions)
        .bind(expense_transactions)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to write summary {id}"))?;

        let row: SummaryRow = sqlx::query_as(SELECT_SUMMARY)
            .bind(&id)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Failed to read back summary {id}"))?;
        tx.commit().await?;
        Summary::try_from(row)
    }
}

#[async_trait::async_trait]
impl DashboardMetricsStore for Db {
    async fn get_by_month(&self, period: &Period) -> Result<Option<DashboardMetrics>> {
        let row: Option<MetricsRow> = sqlx::query_as(SELECT_METRICS)
            .bind(period.document_id())
            .fetch_optional(self.pool())
            .await
            .context("Failed to query dashboard metrics")?;
        row.map(DashboardMetrics::try_from).transpose()
    }

    async fn upsert(&self, data: DashboardMetricsUpsertData) -> Result<DashboardMetrics> {
        let id = data.document_id();
        let now = encode_time(utils::now());
        let bank_totals = serde_json::to_string(&data.bank_totals)?;
        let category_totals = serde_json::to_string(&data.category_totals)?;

        let mut tx = self.pool().begin().await?;
        sqlx::query(
            r#"
INSERT INTO dashboard_metrics (id, user_id, year, month, bank_totals, category_totals,
                               created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (id) DO UPDATE SET
    bank_totals = excluded.bank_totals,
    category_totals = excluded.category_totals,
    updated_at = excluded.updated_at"#,
        )
        .bind(&id)
        .bind(&data.user_id)
        .bind(data.year)
        .bind(i64::from(data.month))
        .bind(bank_totals)
        .bind(category_totals)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to write dashboard metrics {id}"))?;

        let row: MetricsRow = sqlx::query_as(SELECT_METRICS)
            .bind(&id)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("Failed to read back dashboard metrics {id}"))?;
        tx.commit().await?;
        DashboardMetrics::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        DashboardMetricsUpsertData, MetricEntry, Period, SummaryItem, SummaryUpsertData,
    };
    use crate::model::PaymentStatus;
    use crate::store::{DashboardMetricsStore, SummaryStore};
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::time::Duration;

    fn period() -> Period {
        Period::new("user-1", 2025, 3).unwrap()
    }

    fn summary_data(expense: i64) -> SummaryUpsertData {
        let item = SummaryItem {
            transaction_id: "t1".to_string(),
            label: "Aluguel".to_string(),
            value: Decimal::new(expense, 2),
            payment_status: PaymentStatus::Pending,
            payment_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        };
        SummaryUpsertData {
            user_id: "user-1".to_string(),
            year: 2025,
            month: 3,
            income_total: Decimal::ZERO,
            expense_total: Decimal::new(expense, 2),
            balance: -Decimal::new(expense, 2),
            income_transactions: Vec::new(),
            expense_transactions: vec![item],
        }
    }

    #[tokio::test]
    async fn test_summary_upsert_replaces_and_keeps_created_at() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();
        assert!(SummaryStore::get_by_month(&db, &period())
            .await
            .unwrap()
            .is_none());

        let first = SummaryStore::upsert(&db, summary_data(150000)).await.unwrap();
        assert_eq!(first.id, "user-1_2025-03");
        assert_eq!(first.created_at, first.updated_at);

        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = SummaryStore::upsert(&db, summary_data(99)).await.unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.data, summary_data(99));

        let loaded = SummaryStore::get_by_month(&db, &period()).await.unwrap();
        assert_eq!(loaded, Some(second));
    }

    #[tokio::test]
    async fn test_metrics_upsert_round_trips_entries() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();
        let data = DashboardMetricsUpsertData {
            user_id: "user-1".to_string(),
            year: 2025,
            month: 3,
            bank_totals: vec![
                MetricEntry::new("itau", "Itaú", Decimal::new(3050, 2)),
                MetricEntry::new("sem-banco", "Sem banco", Decimal::new(10, 2)),
            ],
            category_totals: vec![MetricEntry::new(
                "sem-categoria",
                "Sem categoria",
                Decimal::new(3060, 2),
            )],
        };
        let stored = DashboardMetricsStore::upsert(&db, data.clone()).await.unwrap();
        assert_eq!(stored.data, data);

        let other = Period::new("user-2", 2025, 3).unwrap();
        assert!(DashboardMetricsStore::get_by_month(&db, &other)
            .await
            .unwrap()
            .is_none());
        let loaded = DashboardMetricsStore::get_by_month(&db, &period())
            .await
            .unwrap();
        assert_eq!(loaded, Some(stored));
    }
}
