use clap::Parser;
use std::process::ExitCode;

use automail_lib::interfaces::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    automail_lib::run(Cli::parse()).await
}
