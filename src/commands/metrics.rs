use crate::args::PeriodArgs;
use crate::commands::{period, services, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, DashboardMetrics, MetricEntry, Period};
use crate::{Config, Result};

/// Shows the stored dashboard metrics of a month, computing and storing them first if there are
/// none.
pub async fn metrics_get(
    config: &Config,
    user: &str,
    args: PeriodArgs,
) -> Result<Out<DashboardMetrics>> {
    let period = period(user, args)?;
    let metrics = services(config)
        .metrics()
        .load_or_sync(&period)
        .await
        .pub_result(ErrorType::Database)?;
    Ok(Out::new(describe(&period, &metrics), metrics))
}

/// Recomputes the dashboard metrics of a month from its transactions and stores them.
pub async fn metrics_sync(
    config: &Config,
    user: &str,
    args: PeriodArgs,
) -> Result<Out<DashboardMetrics>> {
    let period = period(user, args)?;
    let metrics = services(config)
        .metrics()
        .sync(&period)
        .await
        .pub_result(ErrorType::Database)?;
    Ok(Out::new(
        format!("Synchronized {}", describe(&period, &metrics)),
        metrics,
    ))
}

fn describe(period: &Period, metrics: &DashboardMetrics) -> String {
    let mut s = format!("{period} expenses by bank:");
    push_entries(&mut s, &metrics.data.bank_totals);
    s.push_str("\nby category:");
    push_entries(&mut s, &metrics.data.category_totals);
    s
}

fn push_entries(s: &mut String, entries: &[MetricEntry]) {
    if entries.is_empty() {
        s.push_str(" none");
    }
    for entry in entries {
        s.push_str(&format!("\n  {}  {}", Amount::new(entry.total), entry.label));
    }
}
