//! Types that represent the core data model, such as `Transaction`, `Summary` and
//! `DashboardMetrics`.
mod amount;
mod finance;
mod member;
mod metrics;
mod period;
mod summary;
mod transaction;

pub use amount::{Amount, AmountFormat};
pub use finance::{ExpenseCategory, IncomeCategory, Origin, PaymentStatus, PaymentType};
pub use member::{Member, NewMember};
pub use metrics::{DashboardMetrics, DashboardMetricsUpsertData, MetricEntry};
pub use period::{document_id, Period, MAX_TRAILING_MONTHS};
pub use summary::{Summary, SummaryItem, SummaryUpsertData};
pub use transaction::{NewTransaction, Transaction, MAX_INSTALLMENTS};
