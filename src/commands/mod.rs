//! Command handlers for the famfin CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod init;
mod member;
mod metrics;
mod summary;
mod transaction;

use crate::args::PeriodArgs;
use crate::error::{ErrorType, IntoResult};
use crate::model::Period;
use crate::services::Services;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info};

pub use init::init;
pub use member::{add_member, list_members};
pub use metrics::{metrics_get, metrics_sync};
pub use summary::{summary_get, summary_history, summary_sync};
pub use transaction::{add_transaction, list_transactions};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Builds the services on top of the database held by `config`.
fn services(config: &Config) -> Services {
    Services::new(Arc::new(config.db().clone()))
}

fn period(user: &str, args: PeriodArgs) -> Result<Period> {
    Period::new(user, args.year, args.month).pub_result(ErrorType::Request)
}
