use crate::args::{HistoryArgs, PeriodArgs};
use crate::commands::{period, services, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Period, Summary};
use crate::{Config, Result};

/// Shows the stored summary of a month, computing and storing it first if there is none.
pub async fn summary_get(config: &Config, user: &str, args: PeriodArgs) -> Result<Out<Summary>> {
    let period = period(user, args)?;
    let summary = services(config)
        .summaries()
        .load_or_sync(&period)
        .await
        .pub_result(ErrorType::Database)?;
    Ok(Out::new(describe(&period, &summary), summary))
}

/// Recomputes the summary of a month from its transactions and stores it.
pub async fn summary_sync(config: &Config, user: &str, args: PeriodArgs) -> Result<Out<Summary>> {
    let period = period(user, args)?;
    let summary = services(config)
        .summaries()
        .sync(&period)
        .await
        .pub_result(ErrorType::Database)?;
    Ok(Out::new(
        format!("Synchronized {}", describe(&period, &summary)),
        summary,
    ))
}

/// Shows the summaries of `args.months` months ending with the given month, oldest first.
pub async fn summary_history(
    config: &Config,
    user: &str,
    args: HistoryArgs,
) -> Result<Out<Vec<Summary>>> {
    let periods = period(user, args.period)?
        .trailing(args.months)
        .pub_result(ErrorType::Request)?;
    let summaries = services(config)
        .summaries()
        .history(&periods)
        .await
        .pub_result(ErrorType::Database)?;

    let lines: Vec<String> = periods
        .iter()
        .zip(&summaries)
        .map(|(period, summary)| describe(period, summary))
        .collect();
    Ok(Out::new(lines.join("\n"), summaries))
}

fn describe(period: &Period, summary: &Summary) -> String {
    format!(
        "{period}: income {}, expenses {}, balance {}",
        Amount::new(summary.income_total()),
        Amount::new(summary.expense_total()),
        Amount::new(summary.balance())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SummaryStore;
    use crate::test::{seed, TestEnv, USER};

    const MARCH: PeriodArgs = PeriodArgs {
        year: 2025,
        month: 3,
    };

    #[tokio::test]
    async fn test_get_computes_missing_summary() {
        let env = TestEnv::new().await;
        let config = env.config();
        seed(config.db(), USER).await;

        let out = summary_get(&config, USER, MARCH).await.unwrap();
        assert_eq!(
            out.message(),
            "2025-03: income R$ 6.500,00, expenses R$ 2.223,50, balance R$ 4.276,50"
        );
        let period = Period::new(USER, 2025, 3).unwrap();
        let stored = SummaryStore::get_by_month(config.db(), &period)
            .await
            .unwrap();
        assert_eq!(stored.as_ref(), out.structure());
    }

    #[tokio::test]
    async fn test_sync_then_get_returns_same_document() {
        let env = TestEnv::new().await;
        let config = env.config();
        seed(config.db(), USER).await;
        let synced = summary_sync(&config, USER, MARCH).await.unwrap();
        let got = summary_get(&config, USER, MARCH).await.unwrap();
        assert_eq!(synced.structure(), got.structure());
        assert!(synced.message().starts_with("Synchronized 2025-03"));
    }

    #[tokio::test]
    async fn test_history() {
        let env = TestEnv::new().await;
        let config = env.config();
        seed(config.db(), USER).await;
        let args = HistoryArgs {
            period: PeriodArgs {
                year: 2025,
                month: 4,
            },
            months: 3,
        };
        let out = summary_history(&config, USER, args).await.unwrap();
        let months: Vec<u32> = out
            .structure()
            .unwrap()
            .iter()
            .map(|s| s.data.month)
            .collect();
        assert_eq!(months, vec![2, 3, 4]);
        assert_eq!(out.message().lines().count(), 3);
    }

    #[tokio::test]
    async fn test_invalid_month_is_a_request_error() {
        let env = TestEnv::new().await;
        let args = PeriodArgs {
            year: 2025,
            month: 13,
        };
        let err = summary_get(&env.config(), USER, args).await.unwrap_err();
        assert_eq!(err.to_string(), "request error");
    }
}
