use crate::model::period::YEARS;
use crate::model::{ExpenseCategory, IncomeCategory, Origin, PaymentStatus, PaymentType, Period};
use crate::{utils, Result};
use anyhow::{ensure, Context};
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The most installments an expense can be split into.
pub const MAX_INSTALLMENTS: u32 = 120;

/// A single income or expense record. Transactions are owned by one user and are never modified
/// after they have been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub label: String,
    pub description: Option<String>,
    /// Always positive; `origin` carries the direction.
    pub value: Decimal,
    pub payment_date: NaiveDate,
    pub origin: Origin,
    /// Only set for expenses.
    pub category: Option<ExpenseCategory>,
    /// Only set for income.
    pub income_category: Option<IncomeCategory>,
    /// Only set for expenses.
    pub payment_type: Option<PaymentType>,
    pub bank: String,
    pub payment_status: PaymentStatus,
    pub member_id: Option<String>,
    pub member_name: Option<String>,
    pub installment_count: u32,
    pub installment_number: u32,
    /// Shared by all installments that were created from the same purchase.
    pub installment_group_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds the stored form of `new` using the identifier and timestamp assigned by a store.
    pub fn from_new(new: NewTransaction, id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            user_id: new.user_id,
            label: new.label,
            description: new.description,
            value: new.value,
            payment_date: new.payment_date,
            origin: new.origin,
            category: new.category,
            income_category: new.income_category,
            payment_type: new.payment_type,
            bank: new.bank,
            payment_status: new.payment_status,
            member_id: new.member_id,
            member_name: new.member_name,
            installment_count: new.installment_count,
            installment_number: new.installment_number,
            installment_group_id: new.installment_group_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// The calendar month, for this transaction's user, in which it is paid.
    pub fn period(&self) -> Result<Period> {
        Period::containing(self.user_id.clone(), self.payment_date)
    }

    pub fn is_expense(&self) -> bool {
        self.origin == Origin::Expense
    }

    pub fn is_income(&self) -> bool {
        self.origin == Origin::Income
    }
}

/// A transaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewTransaction {
    pub user_id: String,
    pub label: String,
    pub description: Option<String>,
    pub value: Decimal,
    pub payment_date: NaiveDate,
    pub origin: Origin,
    pub category: Option<ExpenseCategory>,
    pub income_category: Option<IncomeCategory>,
    pub payment_type: Option<PaymentType>,
    pub bank: String,
    pub payment_status: PaymentStatus,
    pub member_id: Option<String>,
    pub member_name: Option<String>,
    pub installment_count: u32,
    pub installment_number: u32,
    pub installment_group_id: Option<String>,
}

impl NewTransaction {
    /// Creates a single, paid, non-installment transaction. The remaining fields can be set
    /// directly.
    pub fn new(
        user_id: impl Into<String>,
        label: impl Into<String>,
        value: Decimal,
        payment_date: NaiveDate,
        origin: Origin,
        bank: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            label: label.into(),
            description: None,
            value,
            payment_date,
            origin,
            category: None,
            income_category: None,
            payment_type: None,
            bank: bank.into(),
            payment_status: PaymentStatus::Paid,
            member_id: None,
            member_name: None,
            installment_count: 1,
            installment_number: 1,
            installment_group_id: None,
        }
    }

    /// Checks the invariants every stored transaction must satisfy.
    ///
    /// # Errors
    /// - The user id, label or bank is blank.
    /// - The value is zero or negative.
    /// - The payment date is outside of the years 1 through 9999.
    /// - The installment number is outside of `1..=installment_count`.
    /// - An expense carries an income category, or an income carries an expense category or a
    ///   payment type.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.user_id.trim().is_empty(),
            "A transaction requires a user id"
        );
        ensure!(
            !self.label.trim().is_empty(),
            "A transaction requires a label"
        );
        ensure!(
            self.value > Decimal::ZERO,
            "The value of '{}' must be greater than zero, got {}",
            self.label,
            self.value
        );
        ensure!(
            YEARS.contains(&self.payment_date.year()),
            "The payment date {} of '{}' is outside of the years 1 to 9999",
            self.payment_date,
            self.label
        );
        ensure!(
            !self.bank.trim().is_empty(),
            "The transaction '{}' requires a bank",
            self.label
        );
        ensure!(
            self.installment_number >= 1 && self.installment_number <= self.installment_count,
            "Installment {} of {} is out of range",
            self.installment_number,
            self.installment_count
        );
        match self.origin {
            Origin::Expense => ensure!(
                self.income_category.is_none(),
                "An expense cannot have an income category"
            ),
            Origin::Income => ensure!(
                self.category.is_none() && self.payment_type.is_none(),
                "Income cannot have an expense category or a payment type"
            ),
        }
        Ok(())
    }

    /// Splits this expense into `count` monthly installments, each carrying the full `value`.
    ///
    /// `count` is raised to 2 if it is smaller and may not exceed `MAX_INSTALLMENTS`. The first installment is paid in the month of
    /// `payment_date` when `include_current_month` is true, otherwise one month later. Dates that
    /// do not exist in a later month are clamped to its last day, e.g. Jan 31 -> Feb 28.
    pub fn into_installments(
        self,
        count: u32,
        include_current_month: bool,
    ) -> Result<Vec<NewTransaction>> {
        ensure!(
            self.origin == Origin::Expense,
            "Only expenses can be paid in installments"
        );
        ensure!(
            count <= MAX_INSTALLMENTS,
            "Cannot split '{}' into {count} installments, the limit is {MAX_INSTALLMENTS}",
            self.label
        );
        let count = count.max(2);
        let offset = if include_current_month { 0 } else { 1 };
        let group_id = utils::generate_id();
        let mut installments = Vec::new();
        for ix in 0..count {
            let payment_date = self
                .payment_date
                .checked_add_months(Months::new(ix + offset))
                .with_context(|| {
                    format!(
                        "Installment {} of '{}' falls outside of the supported date range",
                        ix + 1,
                        self.label
                    )
                })?;
            installments.push(NewTransaction {
                payment_date,
                installment_count: count,
                installment_number: ix + 1,
                installment_group_id: Some(group_id.clone()),
                ..self.clone()
            });
        }
        Ok(installments)
    }
}
