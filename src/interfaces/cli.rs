use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{FormSubmissionUseCase, SubmissionSettings, VerificationUseCase};
use crate::domain::error::{AppError, Result};
use crate::domain::submission::{SubmissionOutcome, SubmissionRequest, SubmitEvent};
use crate::domain::verification::VerificationReport;
use crate::infrastructure::browser::HttpBrowserSession;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::dom::MemoryDocument;
use crate::infrastructure::logging::{add_log, SharedLogs};
use crate::infrastructure::transport::HttpTransport;

#[derive(Parser, Debug)]
#[command(
    name = "automail",
    version,
    about = "Submit emails to the classification page and verify it end to end"
)]
pub struct Cli {
    /// TOML config file (defaults to ./automail.toml when present)
    #[arg(long, global = true, env = "AUTOMAIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides `base_url` from the configuration
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one form submission to the upload endpoint and print the result region
    Submit(SubmitArgs),
    /// Run the end-to-end check against a running instance
    Verify(VerifyArgs),
}

#[derive(Args, Debug, Default)]
pub struct SubmitArgs {
    /// Email body sent as a text field
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long, default_value = "email_text")]
    pub text_field: String,

    /// File attached to the submission
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[arg(long, default_value = "file")]
    pub file_field: String,

    /// Content type of the attached file
    #[arg(long)]
    pub content_type: Option<String>,

    /// Additional `name=value` text fields, sent in the order given
    #[arg(long = "field", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Overrides the text typed into the email field
    #[arg(long)]
    pub input_text: Option<String>,

    /// Overrides the label expected on the results page
    #[arg(long)]
    pub expected_label: Option<String>,
}

pub fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}

pub async fn build_request(args: &SubmitArgs) -> Result<SubmissionRequest> {
    let mut request = SubmissionRequest::new();
    if let Some(text) = args.text.as_ref() {
        request = request.text(args.text_field.clone(), text.clone());
    }
    if let Some(path) = args.file.as_ref() {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        request = request.file(
            args.file_field.clone(),
            file_name,
            args.content_type.clone(),
            bytes,
        );
    }
    for (name, value) in &args.fields {
        request = request.text(name.clone(), value.clone());
    }

    if request.is_empty() {
        return Err(AppError::ValidationError(
            "Nothing to submit; pass --text, --file or --field".to_string(),
        ));
    }
    Ok(request)
}

pub async fn submit(
    config: &AppConfig,
    args: &SubmitArgs,
    logs: SharedLogs,
) -> Result<(SubmissionOutcome, Arc<MemoryDocument>)> {
    let request = build_request(args).await?;
    let transport = HttpTransport::new(config.base()?, config.request_timeout())?;
    let document = Arc::new(MemoryDocument::new());

    let use_case = FormSubmissionUseCase::new(
        Arc::new(transport),
        document.clone(),
        logs,
        SubmissionSettings {
            endpoint: config.upload_endpoint.clone(),
            region: config.result_region.clone(),
            ordering: config.ordering,
        },
    );

    let mut event = SubmitEvent::new(request);
    let outcome = use_case.handle_submit(&mut event).await;
    Ok((outcome, document))
}

pub async fn verify(
    config: &AppConfig,
    args: &VerifyArgs,
    logs: SharedLogs,
) -> Result<VerificationReport> {
    let mut scenario = config.verification.clone();
    if let Some(input_text) = args.input_text.as_ref() {
        scenario.input_text = input_text.clone();
    }
    if let Some(label) = args.expected_label.as_ref() {
        scenario.expected_label = label.clone();
    }

    add_log(
        &logs,
        "INFO",
        "Cli",
        &format!("Verifying {} (expecting '{}')", config.base_url, scenario.expected_label),
    );

    let mut session = HttpBrowserSession::new(config.request_timeout())?;
    VerificationUseCase::new(logs)
        .execute(&mut session, &config.base_url, &scenario)
        .await
}
