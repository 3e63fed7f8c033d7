//! Transaction command handlers.

use crate::args::{AddTransactionArgs, PeriodArgs};
use crate::commands::{period, services, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, NewTransaction, Origin, Transaction};
use crate::store::{MemberStore, TransactionStore};
use crate::{Config, Result};
use anyhow::{anyhow, ensure};

/// Records a transaction for `user` and refreshes the summary and metrics of every month it
/// touches. With `--installments`, the expense is split into one transaction per month, each
/// carrying the full value.
///
/// # Returns
///
/// On success, returns an `Out` containing the created transactions in payment order.
///
/// # Errors
///
/// - Returns a request error if the transaction is invalid, or if `member_id` does not name a
///   member of `user`.
/// - Returns a database error if a database operation fails.
pub async fn add_transaction(
    config: &Config,
    user: &str,
    args: &AddTransactionArgs,
) -> Result<Out<Vec<Transaction>>> {
    let mut new = NewTransaction::new(
        user,
        args.label.trim(),
        args.value.value(),
        args.date,
        args.origin,
        args.bank.trim(),
    );
    new.description = args.description.clone();
    new.category = args.category;
    new.income_category = args.income_category;
    new.payment_type = args.payment_type;
    new.payment_status = args.status.unwrap_or_default();

    if let Some(member_id) = &args.member_id {
        let member = config
            .db()
            .get(user, member_id)
            .await
            .pub_result(ErrorType::Database)?
            .ok_or_else(|| anyhow!("There is no member with id '{member_id}'"))
            .pub_result(ErrorType::Request)?;
        new.member_id = Some(member.id);
        new.member_name = Some(member.name);
    }

    let batch = build_batch(new, args).pub_result(ErrorType::Request)?;
    let created = services(config)
        .recorder()
        .record(batch)
        .await
        .pub_result(ErrorType::Database)?;

    let message = match created.as_slice() {
        [single] => format!(
            "Recorded {} '{}' of {} on {}",
            single.origin,
            single.label,
            Amount::new(single.value),
            single.payment_date
        ),
        [first, .., last] => format!(
            "Recorded '{}' in {} installments of {} from {} to {}",
            first.label,
            created.len(),
            Amount::new(first.value),
            first.payment_date,
            last.payment_date
        ),
        [] => "Recorded no transactions".to_string(),
    };
    Ok(Out::new(message, created))
}

fn build_batch(new: NewTransaction, args: &AddTransactionArgs) -> Result<Vec<NewTransaction>> {
    let batch = match args.installments {
        Some(count) if count > 1 => {
            ensure!(
                new.origin == Origin::Expense,
                "Only expenses can be paid in installments"
            );
            new.into_installments(count, !args.skip_current_month)?
        }
        _ => vec![new],
    };
    for transaction in &batch {
        transaction.validate()?;
    }
    Ok(batch)
}

/// Lists the transactions of `user` in one month, newest first.
pub async fn list_transactions(
    config: &Config,
    user: &str,
    args: PeriodArgs,
) -> Result<Out<Vec<Transaction>>> {
    let period = period(user, args)?;
    let mut transactions = config
        .db()
        .get_by_month(&period)
        .await
        .pub_result(ErrorType::Database)?;
    transactions.sort_by(|a, b| {
        b.payment_date
            .cmp(&a.payment_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let mut message = format!("{} transactions in {period}", transactions.len());
    for t in &transactions {
        let sign = if t.is_income() { "+" } else { "-" };
        message.push_str(&format!(
            "\n  {}  {sign}{}  {}  {}  {}",
            t.payment_date,
            Amount::new(t.value),
            t.label,
            t.bank,
            t.payment_status
        ));
    }
    Ok(Out::new(message, transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::AddMemberArgs;
    use crate::commands::{add_member, summary_get};
    use crate::model::{ExpenseCategory, IncomeCategory, PaymentStatus};
    use crate::test::{TestEnv, USER};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn args(origin: Origin, value: &str, date: &str) -> AddTransactionArgs {
        AddTransactionArgs {
            label: "Geladeira".to_string(),
            value: Amount::from_str(value).unwrap(),
            date: NaiveDate::from_str(date).unwrap(),
            origin,
            bank: "Itaú".to_string(),
            category: None,
            income_category: None,
            payment_type: None,
            status: None,
            description: None,
            member_id: None,
            installments: None,
            skip_current_month: false,
        }
    }

    #[tokio::test]
    async fn test_add_single_transaction_syncs_month() {
        let env = TestEnv::new().await;
        let config = env.config();
        let mut a = args(Origin::Income, "R$ 5.000,00", "2025-03-05");
        a.income_category = Some(IncomeCategory::Salary);

        let out = add_transaction(&config, USER, &a).await.unwrap();
        let created = out.structure().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].payment_status, PaymentStatus::Paid);
        assert!(out.message().contains("R$ 5.000,00"));

        let summary = summary_get(&config, USER, PeriodArgs { year: 2025, month: 3 })
            .await
            .unwrap();
        assert_eq!(
            summary.structure().unwrap().income_total(),
            Decimal::new(5000, 0)
        );
    }

    #[tokio::test]
    async fn test_add_installments() {
        let env = TestEnv::new().await;
        let config = env.config();
        let mut a = args(Origin::Expense, "3499,90", "2025-01-31");
        a.category = Some(ExpenseCategory::Housing);
        a.installments = Some(3);
        a.skip_current_month = true;

        let out = add_transaction(&config, USER, &a).await.unwrap();
        let dates: Vec<NaiveDate> = out
            .structure()
            .unwrap()
            .iter()
            .map(|t| t.payment_date)
            .collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            ]
        );

        let listed = list_transactions(&config, USER, PeriodArgs { year: 2025, month: 1 })
            .await
            .unwrap();
        assert!(listed.structure().unwrap().is_empty());
        let listed = list_transactions(&config, USER, PeriodArgs { year: 2025, month: 4 })
            .await
            .unwrap();
        assert_eq!(listed.structure().unwrap()[0].installment_number, 3);
    }

    #[tokio::test]
    async fn test_income_installments_rejected() {
        let env = TestEnv::new().await;
        let mut a = args(Origin::Income, "10", "2025-01-31");
        a.installments = Some(2);
        let err = add_transaction(&env.config(), USER, &a).await.unwrap_err();
        assert_eq!(err.to_string(), "request error");
    }

    #[tokio::test]
    async fn test_zero_value_rejected() {
        let env = TestEnv::new().await;
        let a = args(Origin::Expense, "0,00", "2025-01-31");
        let err = add_transaction(&env.config(), USER, &a).await.unwrap_err();
        assert_eq!(err.to_string(), "request error");
        assert!(format!("{err:#}").contains("greater than zero"));
    }

    #[tokio::test]
    async fn test_member_name_is_copied() {
        let env = TestEnv::new().await;
        let config = env.config();
        let member = add_member(
            &config,
            USER,
            &AddMemberArgs {
                name: "Bia".to_string(),
            },
        )
        .await
        .unwrap()
        .structure()
        .unwrap()
        .clone();

        let mut a = args(Origin::Expense, "12.50", "2025-03-01");
        a.member_id = Some(member.id.clone());
        let out = add_transaction(&config, USER, &a).await.unwrap();
        let created = &out.structure().unwrap()[0];
        assert_eq!(created.member_id.as_deref(), Some(member.id.as_str()));
        assert_eq!(created.member_name.as_deref(), Some("Bia"));

        a.member_id = Some("missing".to_string());
        let err = add_transaction(&config, USER, &a).await.unwrap_err();
        assert_eq!(err.to_string(), "request error");
    }
}
