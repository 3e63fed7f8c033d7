use crate::model::document_id;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The expense total of one bank or one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricEntry {
    /// Normalized form of `label`, e.g. `banco-do-brasil`.
    pub key: String,
    pub label: String,
    pub total: Decimal,
}

impl MetricEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>, total: Decimal) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            total,
        }
    }
}

/// The computed content of the dashboard metrics, before they have been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardMetricsUpsertData {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    /// Largest total first.
    pub bank_totals: Vec<MetricEntry>,
    /// Largest total first.
    pub category_totals: Vec<MetricEntry>,
}

impl DashboardMetricsUpsertData {
    pub fn document_id(&self) -> String {
        document_id(&self.user_id, self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardMetrics {
    pub id: String,
    #[serde(flatten)]
    pub data: DashboardMetricsUpsertData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
