use crate::model::{document_id, PaymentStatus, Transaction};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a monthly summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryItem {
    pub transaction_id: String,
    pub label: String,
    pub value: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_date: NaiveDate,
}

impl From<&Transaction> for SummaryItem {
    fn from(transaction: &Transaction) -> Self {
        Self {
            transaction_id: transaction.id.clone(),
            label: transaction.label.clone(),
            value: transaction.value,
            payment_status: transaction.payment_status,
            payment_date: transaction.payment_date,
        }
    }
}

/// The computed content of a monthly summary, before it has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryUpsertData {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    pub income_total: Decimal,
    pub expense_total: Decimal,
    /// `income_total - expense_total`
    pub balance: Decimal,
    /// Newest first.
    pub income_transactions: Vec<SummaryItem>,
    /// Newest first.
    pub expense_transactions: Vec<SummaryItem>,
}

impl SummaryUpsertData {
    pub fn document_id(&self) -> String {
        document_id(&self.user_id, self.year, self.month)
    }
}

/// A stored monthly summary. There is at most one per user and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub id: String,
    #[serde(flatten)]
    pub data: SummaryUpsertData,
    /// Kept from the first time the summary was written.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Summary {
    pub fn income_total(&self) -> Decimal {
        self.data.income_total
    }

    pub fn expense_total(&self) -> Decimal {
        self.data.expense_total
    }

    pub fn balance(&self) -> Decimal {
        self.data.balance
    }
}
