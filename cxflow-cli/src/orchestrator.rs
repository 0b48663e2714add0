//! Workflow orchestration -- step sequencing and failure policy.
//!
//! [`Workflow`] drives one run of the scan pipeline. Every step is awaited
//! in order; there is no parallelism and the process working directory is
//! never changed.
//!
//! # Step Order
//!
//! 1. Configure the API key (skipped when none is supplied)
//! 2. Ensure the project exists (check, then create)
//! 3. Clone the repository unless the checkout path exists
//! 4. Launch the scan
//! 5. Locate the scan id in the scan listing
//! 6. Fetch the JSON and SARIF reports
//! 7. Email the reports
//!
//! Steps 2-5 are skipped when resuming with a known scan id. A failure in
//! steps 1-6 aborts the run. A failure in step 7 is logged and recorded in
//! the [`WorkflowReport`]; the reports stay on disk.

use std::io::Write;

use serde::Serialize;
use tracing::{info, warn};

use cxflow_core::types::{ReportFile, ScanId};
use cxflow_notifier::{MailTransport, Notifier};
use cxflow_scanner::{CheckoutOutcome, CommandRunner, ScanTool};

use crate::error::CliError;
use crate::output::Render;

/// Operator inputs for one run.
#[derive(Debug, Clone, Default)]
pub struct WorkflowRequest {
    pub project: String,
    /// Required unless `scan_id` is set.
    pub branch: Option<String>,
    /// Required unless `scan_id` is set.
    pub repo_url: Option<String>,
    pub api_key: Option<String>,
    /// Resume: fetch reports for this scan instead of launching one.
    pub scan_id: Option<ScanId>,
    pub send_email: bool,
}

/// What happened to the report email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum NotificationOutcome {
    Sent,
    /// Email disabled in config or `--no-email`.
    Skipped,
    Failed(String),
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// `None` when resuming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_created: Option<bool>,
    /// `None` when resuming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<CheckoutOutcome>,
    pub scan_id: ScanId,
    pub resumed: bool,
    pub reports: Vec<ReportFile>,
    pub notification: NotificationOutcome,
}

/// The scan pipeline, generic over process execution and mail delivery.
pub struct Workflow<R, T> {
    tool: ScanTool<R>,
    notifier: Option<Notifier<T>>,
}

impl<R: CommandRunner, T: MailTransport> Workflow<R, T> {
    /// `notifier` is `None` when email is disabled.
    pub fn new(tool: ScanTool<R>, notifier: Option<Notifier<T>>) -> Self {
        Self { tool, notifier }
    }

    /// Execute every step for `request`.
    ///
    /// # Errors
    ///
    /// Returns the first error from steps 1-6. Email failures are not
    /// errors here; see [`WorkflowReport::notification`].
    pub async fn run(&self, request: WorkflowRequest) -> Result<WorkflowReport, CliError> {
        let project = request.project.as_str();
        info!(
            project,
            working_dir = %self.tool.config().working_dir.display(),
            resume = request.scan_id.is_some(),
            "starting scan workflow"
        );

        match request.api_key.as_deref() {
            Some(key) => self.tool.auth().set_api_key(key).await?,
            None => info!("no API key supplied, using existing scan tool configuration"),
        }

        let (scan_id, project_created, checkout) = match request.scan_id.clone() {
            Some(scan_id) => {
                info!(project, scan_id = %scan_id, "resuming with existing scan");
                (scan_id, None, None)
            }
            None => {
                let branch = required(request.branch.as_deref(), "--branch")?;
                let repo_url = required(request.repo_url.as_deref(), "--repo-url")?;

                let created = self.tool.projects().ensure(project).await?;
                let checkout = self.tool.repository().ensure_checkout(repo_url).await?;
                self.tool.launcher().launch(project, branch).await?;
                let scan_id = self.tool.locator().locate(project).await?;
                (scan_id, Some(created), Some(checkout))
            }
        };

        let reports = self.tool.reports().fetch(&scan_id).await?;

        let notification = if request.send_email {
            self.notify(project, &reports).await
        } else {
            info!("email disabled for this run");
            NotificationOutcome::Skipped
        };

        info!(project, scan_id = %scan_id, "scan workflow finished");
        Ok(WorkflowReport {
            project: request.project,
            branch: request.branch,
            project_created,
            checkout,
            scan_id,
            resumed: request.scan_id.is_some(),
            reports,
            notification,
        })
    }

    async fn notify(&self, project: &str, reports: &[ReportFile]) -> NotificationOutcome {
        let Some(notifier) = &self.notifier else {
            info!("email not configured, skipping notification");
            return NotificationOutcome::Skipped;
        };

        match notifier.send_reports(project, reports).await {
            Ok(()) => NotificationOutcome::Sent,
            Err(e) => {
                warn!(error = %e, "report email failed, reports remain on disk");
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }
}

fn required<'a>(value: Option<&'a str>, flag: &str) -> Result<&'a str, CliError> {
    value.ok_or_else(|| CliError::Command(format!("{flag} is required unless --scan-id is given")))
}

impl WorkflowReport {
    /// Exit status for this report: an email failure becomes
    /// [`CliError::Email`].
    pub fn into_result(self) -> Result<Self, CliError> {
        match &self.notification {
            NotificationOutcome::Failed(reason) => Err(CliError::Email(reason.clone())),
            _ => Ok(self),
        }
    }
}

impl Render for WorkflowReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Scan Workflow: {}", self.project.bold())?;
        if let Some(branch) = &self.branch {
            writeln!(w, "  Branch:   {}", branch)?;
        }
        match self.project_created {
            Some(true) => writeln!(w, "  Project:  {}", "created".green())?,
            Some(false) => writeln!(w, "  Project:  existing")?,
            None => {}
        }
        if let Some(checkout) = self.checkout {
            writeln!(w, "  Checkout: {}", checkout)?;
        }
        let scan_label = if self.resumed { " (resumed)" } else { "" };
        writeln!(w, "  Scan ID:  {}{}", self.scan_id.as_str().cyan(), scan_label)?;

        writeln!(w, "  Reports:")?;
        for report in &self.reports {
            writeln!(w, "    {}", report)?;
        }

        match &self.notification {
            NotificationOutcome::Sent => writeln!(w, "  Email:    {}", "SENT".green().bold())?,
            NotificationOutcome::Skipped => writeln!(w, "  Email:    {}", "SKIPPED".yellow())?,
            NotificationOutcome::Failed(reason) => {
                writeln!(w, "  Email:    {}", "FAILED".red().bold())?;
                writeln!(w, "  Error:    {}", reason.red())?;
            }
        }

        Ok(())
    }
}
