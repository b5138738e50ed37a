use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its outbox and an initial `config.json`.
///
/// # Arguments
/// - `cars_home` - The directory that will be the home directory, e.g. `$HOME/cars`
/// - `data` - The sales data file to use by default. It must exist.
/// - `recipient` - Who receives the summary email.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(
    cars_home: &Path,
    data: Option<&Path>,
    recipient: Option<&str>,
) -> Result<Out<()>> {
    let config = Config::create(cars_home, data, recipient)
        .await
        .context("Unable to create the home directory and config")?;
    Ok(format!(
        "Successfully created the cars home directory at {}",
        config.root().display()
    )
    .into())
}
