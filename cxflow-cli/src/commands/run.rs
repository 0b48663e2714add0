//! `cxflow run` command handler

use tracing::info;

use cxflow_core::config::{CxflowConfig, EmailConfig};
use cxflow_core::types::ScanId;
use cxflow_notifier::{Notifier, NotifierConfig, SmtpMailTransport};
use cxflow_scanner::{ScanTool, ScanToolConfig};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::orchestrator::{Workflow, WorkflowRequest};
use crate::output::OutputWriter;

/// Execute the `run` command.
///
/// Builds the production scan tool and, when email is enabled, the SMTP
/// notifier, then runs the workflow and renders its report. The report is
/// rendered even when the email step failed; the returned error then carries
/// the email exit code.
///
/// # Errors
///
/// - `CliError::Config` if scanner settings are invalid, or email is enabled
///   and its settings or password are missing
/// - `CliError::Tool` / `CliError::ScanNotFound` from workflow steps
/// - `CliError::Email` if the reports were generated but not delivered
pub async fn execute(
    args: RunArgs,
    config: &CxflowConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let scan_config = ScanToolConfig::from_core(config);
    scan_config.validate()?;
    let tool = ScanTool::with_process_runner(scan_config);

    let send_email = config.email.enabled && !args.no_email;
    let notifier = if send_email {
        Some(build_notifier(&config.email)?)
    } else {
        None
    };

    let request = WorkflowRequest {
        project: args.project,
        branch: args.branch,
        repo_url: args.repo_url,
        api_key: args.api_key,
        scan_id: args.scan_id.map(ScanId::new),
        send_email,
    };

    let report = Workflow::new(tool, notifier).run(request).await?;
    writer.render(&report)?;
    report.into_result().map(|_| ())
}

/// SMTP notifier from the `[email]` section.
///
/// Settings and the password variable are checked here, before any step
/// runs, so a misconfigured mailer fails fast instead of after the scan.
pub fn build_notifier(email: &EmailConfig) -> Result<Notifier<SmtpMailTransport>, CliError> {
    let config = NotifierConfig::from_core(email);
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    let transport =
        SmtpMailTransport::from_env(&config).map_err(|e| CliError::Config(e.to_string()))?;
    info!(endpoint = %transport.endpoint(), recipient = %config.recipient, "email notifications enabled");
    Ok(Notifier::new(transport, config))
}
