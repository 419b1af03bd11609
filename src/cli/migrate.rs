use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

use helpdesk::config::Server as Config;
use helpdesk::database::Pool;

#[derive(Debug, Error)]
#[error("Could not run database migrations")]
pub struct MigrateError;

/// Apply pending database migrations and exit
#[derive(Debug, Parser)]
pub struct MigrateCommand {}

pub fn run(_args: MigrateCommand) -> Result<(), MigrateError> {
    let config = Config::load().change_context(MigrateError)?;
    helpdesk::logging::init(&config.logging).change_context(MigrateError)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .change_context(MigrateError)
        .attach_printable("could not build tokio runtime")?
        .block_on(async move {
            let pool = Pool::new(&config.db).change_context(MigrateError)?;
            pool.wait_until_healthy().await.change_context(MigrateError)?;
            pool.migrate().await.change_context(MigrateError)
        })
}
