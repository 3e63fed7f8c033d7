//! These structs provide the CLI interface for the famfin CLI.

use crate::model::{
    Amount, ExpenseCategory, IncomeCategory, Origin, PaymentStatus, PaymentType, MAX_INSTALLMENTS,
    MAX_TRAILING_MONTHS,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// famfin: A command-line tool for tracking household finances.
///
/// Record the income and expenses of a household, split purchases into monthly installments and
/// keep a monthly summary (income, expenses and balance) and dashboard metrics (expenses per bank
/// and per category) for every month that has activity.
///
/// Run `famfin init` first to create the data directory.
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and the database.
    ///
    /// The data directory is --famfin-home, which defaults to $HOME/famfin. Pass --default-user so
    /// that later commands do not need --user.
    Init(InitArgs),
    /// Add or list the members of the household.
    Member(MemberArgs),
    /// Record or list transactions.
    Transaction(TransactionArgs),
    /// Read or recompute monthly summaries.
    Summary(SummaryArgs),
    /// Read or recompute the monthly dashboard metrics.
    Metrics(MetricsArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, global = true, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where famfin data and configuration is held. Defaults to ~/famfin
    #[arg(long, global = true, env = "FAMFIN_HOME", default_value_t = default_famfin_home())]
    famfin_home: DisplayPath,

    /// The user whose finances are read or written. Defaults to the default_user in config.json
    #[arg(long, global = true, env = "FAMFIN_USER")]
    user: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, famfin_home: PathBuf, user: Option<String>) -> Self {
        Self {
            log_level,
            famfin_home: famfin_home.into(),
            user,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn famfin_home(&self) -> &DisplayPath {
        &self.famfin_home
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

/// (Not shown): Args for the `famfin init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The user id that commands operate on when --user is not given.
    #[arg(long)]
    default_user: Option<String>,
}

impl InitArgs {
    pub fn new(default_user: Option<String>) -> Self {
        Self { default_user }
    }

    pub fn default_user(&self) -> Option<&str> {
        self.default_user.as_deref()
    }
}

/// (Not shown): Args for the `famfin member` command.
#[derive(Debug, Parser, Clone)]
pub struct MemberArgs {
    #[command(subcommand)]
    command: MemberSubcommand,
}

impl MemberArgs {
    pub fn command(&self) -> &MemberSubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum MemberSubcommand {
    /// Add a member to the household.
    Add(AddMemberArgs),
    /// List the members of the household.
    List,
}

#[derive(Debug, Parser, Clone)]
pub struct AddMemberArgs {
    /// The name of the member.
    #[arg(long)]
    pub name: String,
}

/// (Not shown): Args for the `famfin transaction` command.
#[derive(Debug, Parser, Clone)]
pub struct TransactionArgs {
    #[command(subcommand)]
    command: TransactionSubcommand,
}

impl TransactionArgs {
    pub fn command(&self) -> &TransactionSubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionSubcommand {
    /// Record a transaction, or an expense split into monthly installments, and refresh the
    /// summaries and metrics of the affected months.
    Add(Box<AddTransactionArgs>),
    /// List the transactions of one month, newest first.
    List(PeriodArgs),
}

/// Args for `famfin transaction add`.
///
/// Categories, payment types and statuses accept either their display name (e.g. "Supermercado",
/// "Crédito", "Pendente") or their English name (e.g. "groceries", "credit", "pending").
#[derive(Debug, Parser, Clone)]
pub struct AddTransactionArgs {
    /// A short name for the transaction.
    #[arg(long)]
    pub label: String,

    /// The value, always positive. Accepts "1234.56", "1.234,56" or "R$ 1.234,56".
    #[arg(long)]
    pub value: Amount,

    /// The payment date, as YYYY-MM-DD. For installments, the date of the first installment.
    #[arg(long)]
    pub date: NaiveDate,

    /// Either "expense" or "income".
    #[arg(long)]
    pub origin: Origin,

    /// The bank or account the money moved through.
    #[arg(long)]
    pub bank: String,

    /// The category of an expense.
    #[arg(long)]
    pub category: Option<ExpenseCategory>,

    /// The category of income.
    #[arg(long)]
    pub income_category: Option<IncomeCategory>,

    /// How an expense was paid.
    #[arg(long)]
    pub payment_type: Option<PaymentType>,

    /// The payment status. Defaults to paid.
    #[arg(long)]
    pub status: Option<PaymentStatus>,

    #[arg(long)]
    pub description: Option<String>,

    /// The id of the household member the transaction belongs to.
    #[arg(long)]
    pub member_id: Option<String>,

    /// Split an expense into this many monthly installments, each with the full value.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_INSTALLMENTS)))]
    pub installments: Option<u32>,

    /// Start the installments in the month after --date instead of the month of --date.
    #[arg(long, requires = "installments")]
    pub skip_current_month: bool,
}

/// A calendar month.
#[derive(Debug, Parser, Clone, Copy)]
pub struct PeriodArgs {
    #[arg(long)]
    pub year: i32,

    /// 1 through 12.
    #[arg(long)]
    pub month: u32,
}

/// (Not shown): Args for the `famfin summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    #[command(subcommand)]
    command: SummarySubcommand,
}

impl SummaryArgs {
    pub fn command(&self) -> &SummarySubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SummarySubcommand {
    /// Show the stored summary of a month, computing it first if there is none.
    Get(PeriodArgs),
    /// Recompute and store the summary of a month.
    Sync(PeriodArgs),
    /// Show the summaries of the months ending with --year/--month, oldest first.
    History(HistoryArgs),
}

#[derive(Debug, Parser, Clone, Copy)]
pub struct HistoryArgs {
    #[clap(flatten)]
    pub period: PeriodArgs,

    /// How many months to show.
    #[arg(
        long,
        default_value_t = 6,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TRAILING_MONTHS))
    )]
    pub months: u32,
}

/// (Not shown): Args for the `famfin metrics` command.
#[derive(Debug, Parser, Clone)]
pub struct MetricsArgs {
    #[command(subcommand)]
    command: MetricsSubcommand,
}

impl MetricsArgs {
    pub fn command(&self) -> &MetricsSubcommand {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum MetricsSubcommand {
    /// Show the stored metrics of a month, computing them first if there are none.
    Get(PeriodArgs),
    /// Recompute and store the metrics of a month.
    Sync(PeriodArgs),
}

fn default_famfin_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("famfin"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --famfin-home or FAMFIN_HOME instead of relying on the default \
                famfin home directory."
            );
            PathBuf::from("famfin")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
