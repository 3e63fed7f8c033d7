use super::{decode_date, decode_decimal, decode_time, encode_date, encode_time, Db};
use crate::model::{NewTransaction, Transaction};
use crate::store::TransactionStore;
use crate::{utils, Result};
use anyhow::Context;
use chrono::NaiveDate;
use std::str::FromStr;

const SELECT: &str = r#"
SELECT id, user_id, label, description, value, payment_date, origin, category, income_category,
       payment_type, bank, payment_status, member_id, member_name, installment_count,
       installment_number, installment_group_id, created_at, updated_at
FROM transactions"#;

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: String,
    user_id: String,
    label: String,
    description: Option<String>,
    value: String,
    payment_date: String,
    origin: String,
    category: Option<String>,
    income_category: Option<String>,
    payment_type: Option<String>,
    bank: String,
    payment_status: String,
    member_id: Option<String>,
    member_name: Option<String>,
    installment_count: i64,
    installment_number: i64,
    installment_group_id: Option<String>,
    created_at: String,
    updated_at: String,
}

fn parse_opt<T: FromStr>(value: Option<String>) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .map(|s| T::from_str(&s).with_context(|| format!("Invalid value '{s}'")))
        .transpose()
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(row: TransactionRow) -> Result<Self> {
        let id = row.id;
        let decode = || -> Result<Transaction> {
            Ok(Transaction {
                id: id.clone(),
                user_id: row.user_id,
                label: row.label,
                description: row.description,
                value: decode_decimal(&row.value)?,
                payment_date: decode_date(&row.payment_date)?,
                origin: row.origin.parse()?,
                category: parse_opt(row.category)?,
                income_category: parse_opt(row.income_category)?,
                payment_type: parse_opt(row.payment_type)?,
                bank: row.bank,
                payment_status: row.payment_status.parse()?,
                member_id: row.member_id,
                member_name: row.member_name,
                installment_count: u32::try_from(row.installment_count)?,
                installment_number: u32::try_from(row.installment_number)?,
                installment_group_id: row.installment_group_id,
                created_at: decode_time(&row.created_at)?,
                updated_at: decode_time(&row.updated_at)?,
            })
        };
        decode().with_context(|| format!("Unable to read transaction {id}"))
    }
}

fn collect(rows: Vec<TransactionRow>) -> Result<Vec<Transaction>> {
    rows.into_iter().map(Transaction::try_from).collect()
}

#[async_trait::async_trait]
impl TransactionStore for Db {
    async fn create(&self, transaction: NewTransaction) -> Result<Transaction> {
        transaction.validate()?;
        let created = Transaction::from_new(transaction, utils::generate_id(), utils::now());
        sqlx::query(
            r#"
INSERT INTO transactions (id, user_id, label, description, value, payment_date, origin, category,
                          income_category, payment_type, bank, payment_status, member_id,
                          member_name, installment_count, installment_number,
                          installment_group_id, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&created.id)
        .bind(&created.user_id)
        .bind(&created.label)
        .bind(&created.description)
        .bind(created.value.to_string())
        .bind(encode_date(created.payment_date))
        .bind(created.origin.to_string())
        .bind(created.category.map(|c| c.to_string()))
        .bind(created.income_category.map(|c| c.to_string()))
        .bind(created.payment_type.map(|p| p.to_string()))
        .bind(&created.bank)
        .bind(created.payment_status.to_string())
        .bind(&created.member_id)
        .bind(&created.member_name)
        .bind(i64::from(created.installment_count))
        .bind(i64::from(created.installment_number))
        .bind(&created.installment_group_id)
        .bind(encode_time(created.created_at))
        .bind(encode_time(created.updated_at))
        .execute(self.pool())
        .await
        .with_context(|| format!("Failed to insert transaction '{}'", created.label))?;
        Ok(created)
    }

    async fn get_all(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!("{SELECT} WHERE user_id = ?"))
            .bind(user_id)
            .fetch_all(self.pool())
            .await
            .context("Failed to query transactions")?;
        collect(rows)
    }

    async fn get_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT} WHERE user_id = ? AND payment_date >= ? AND payment_date <= ?"
        ))
        .bind(user_id)
        .bind(encode_date(start))
        .bind(encode_date(end))
        .fetch_all(self.pool())
        .await
        .context("Failed to query transactions by date")?;
        collect(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{ExpenseCategory, IncomeCategory, Origin, PaymentStatus, PaymentType, Period};
    use crate::store::TransactionStore;
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();

        let mut new = crate::model::NewTransaction::new(
            "user-1",
            "Farmácia",
            Decimal::new(8990, 2),
            date(2025, 3, 31),
            Origin::Expense,
            "Itaú",
        );
        new.category = Some(ExpenseCategory::Health);
        new.payment_type = Some(PaymentType::Pix);
        new.payment_status = PaymentStatus::Pending;
        new.description = Some("Remédios".to_string());
        let created = db.create(new).await.unwrap();

        let all = db.get_all("user-1").await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn test_get_by_month_bounds() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();
        for (user, d) in [
            ("user-1", date(2025, 2, 28)),
            ("user-1", date(2025, 3, 1)),
            ("user-1", date(2025, 3, 31)),
            ("user-1", date(2025, 4, 1)),
            ("user-2", date(2025, 3, 10)),
        ] {
            let mut income = crate::model::NewTransaction::new(
                user,
                "Salário",
                Decimal::new(100, 0),
                d,
                Origin::Income,
                "Nubank",
            );
            income.income_category = Some(IncomeCategory::Salary);
            db.create(income).await.unwrap();
        }

        let period = Period::new("user-1", 2025, 3).unwrap();
        let mut dates: Vec<NaiveDate> = db
            .get_by_month(&period)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.payment_date)
            .collect();
        dates.sort();
        assert_eq!(dates, vec![date(2025, 3, 1), date(2025, 3, 31)]);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_member() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();
        let mut new = crate::model::NewTransaction::new(
            "user-1",
            "Cinema",
            Decimal::new(40, 0),
            date(2025, 3, 1),
            Origin::Expense,
            "Itaú",
        );
        new.member_id = Some("missing".to_string());
        assert!(db.create(new).await.is_err());
        assert!(db.get_all("user-1").await.unwrap().is_empty());
    }
}
