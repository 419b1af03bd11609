use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

mod migrate;
mod server;

/// Command line options for helpdesk.
#[derive(Debug, Parser)]
#[command(
    about = "Support ticket tracking service",
    version,
    author,
    long_about
)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, Error)]
#[error("Command failed")]
pub struct CliError;

impl Cli {
    pub fn run(self) -> Result<(), CliError> {
        match self.subcommand {
            Subcommand::Server(args) => self::server::run(args).change_context(CliError),
            Subcommand::Migrate(args) => self::migrate::run(args).change_context(CliError),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Server(self::server::ServerCommand),
    Migrate(self::migrate::MigrateCommand),
}
