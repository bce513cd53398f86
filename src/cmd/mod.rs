//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`] or [`health`].

pub mod health;
pub mod run;

use crate::cli::{Cli, Commands};
use crate::error::GatewayError;

pub async fn dispatch(cli: Cli) -> Result<(), GatewayError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  searchgate v{version} \u{2014} authenticating search-cluster gateway\n\n  \
         No command provided. To get started:\n\n    \
         searchgate run                                    Proxy to https://localhost:9200\n    \
         searchgate run --backend-url http://search:9200   Proxy to a specific backend\n    \
         searchgate health                                 Probe a running gateway\n    \
         searchgate --help                                 See all commands and options\n"
    );
}
