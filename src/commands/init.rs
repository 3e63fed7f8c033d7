use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory with an initial `config.json` and an empty database.
///
/// # Arguments
/// - `famfin_home` - The directory that will be the root of data directory, e.g. `$HOME/famfin`
/// - `default_user` - The user id that commands use when `--user` is not given.
///
/// # Errors
/// - Returns an error if the directory already holds a famfin configuration.
/// - Returns an error if any file operations fail.
pub async fn init(famfin_home: &Path, default_user: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(famfin_home, default_user.map(str::to_string))
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the famfin directory at {}",
        config.root().display()
    )
    .into())
}
