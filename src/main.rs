use clap::Parser;
use famfin::args::{
    Args, Command, MemberSubcommand, MetricsSubcommand, SummarySubcommand, TransactionSubcommand,
};
use famfin::{commands, Config, ErrorType, IntoResult, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().famfin_home().path();

    if let Command::Init(init_args) = args.command() {
        commands::init(home, init_args.default_user()).await?.print();
        return Ok(());
    }

    let config = Config::load(home).await.pub_result(ErrorType::Config)?;
    let user = config
        .user(args.common().user())
        .pub_result(ErrorType::Config)?;
    debug!("Operating on the finances of user {user}");

    let _: () = match args.command() {
        Command::Init(_) => (),

        Command::Member(member_args) => match member_args.command() {
            MemberSubcommand::Add(add) => commands::add_member(&config, &user, add).await?.print(),
            MemberSubcommand::List => commands::list_members(&config, &user).await?.print(),
        },

        Command::Transaction(transaction_args) => match transaction_args.command() {
            TransactionSubcommand::Add(add) => commands::add_transaction(&config, &user, add)
                .await?
                .print(),
            TransactionSubcommand::List(period) => {
                commands::list_transactions(&config, &user, *period)
                    .await?
                    .print()
            }
        },

        Command::Summary(summary_args) => match summary_args.command() {
            SummarySubcommand::Get(period) => commands::summary_get(&config, &user, *period)
                .await?
                .print(),
            SummarySubcommand::Sync(period) => commands::summary_sync(&config, &user, *period)
                .await?
                .print(),
            SummarySubcommand::History(history) => {
                commands::summary_history(&config, &user, *history)
                    .await?
                    .print()
            }
        },

        Command::Metrics(metrics_args) => match metrics_args.command() {
            MetricsSubcommand::Get(period) => commands::metrics_get(&config, &user, *period)
                .await?
                .print(),
            MetricsSubcommand::Sync(period) => commands::metrics_sync(&config, &user, *period)
                .await?
                .print(),
        },
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // RUST_LOG does not exist; use the given log level for this crate only.
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_CRATE_NAME"),
            level,
            env!("CARGO_BIN_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
