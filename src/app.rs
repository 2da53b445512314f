use std::process::ExitCode;

use crate::domain::error::Result;
use crate::domain::submission::SubmissionState;
use crate::infrastructure::config::{load_config, AppConfig};
use crate::infrastructure::logging::{init_tracing, new_shared_logs};
use crate::interfaces::cli::{self as commands, Cli, Command};

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url.as_ref() {
        config.base_url = base_url.clone();
        config.validate()?;
    }
    Ok(config)
}

pub async fn run(cli: Cli) -> ExitCode {
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            tracing::error!(error = %err, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_filter);

    let logs = new_shared_logs();

    match cli.command {
        Command::Submit(args) => match commands::submit(&config, &args, logs).await {
            Ok((outcome, document)) => {
                if let Some(content) = document.content(&config.result_region) {
                    println!("{}", content);
                }
                if outcome.state == SubmissionState::RenderedError {
                    ExitCode::FAILURE
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Submission not sent");
                ExitCode::FAILURE
            }
        },
        Command::Verify(args) => match commands::verify(&config, &args, logs).await {
            Ok(report) => {
                println!(
                    "OK {} ({} score cards, text field {})",
                    report.final_url, report.score_card_count, report.text_field
                );
                for card in &report.score_cards {
                    println!("  - {}", card);
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("FAILED {}", err);
                ExitCode::FAILURE
            }
        },
    }
}
