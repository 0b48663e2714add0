//! Scan launch and scan id lookup.
//!
//! `scan create` output is not parsed for an id. The id is recovered from
//! `scan list` instead: the first line mentioning the project wins and its
//! first whitespace-separated token is taken as the id. That line is not
//! guaranteed to be the scan just launched.

use std::sync::Arc;

use cxflow_core::types::ScanId;
use tracing::{debug, info};

use crate::config::ScanToolConfig;
use crate::error::ScannerError;
use crate::runner::CommandRunner;

/// Starts scans through the scan CLI.
pub struct ScanLauncher<R> {
    runner: Arc<R>,
    config: ScanToolConfig,
}

impl<R: CommandRunner> ScanLauncher<R> {
    pub fn new(runner: Arc<R>, config: ScanToolConfig) -> Self {
        Self { runner, config }
    }

    /// Run `scan create` for `project` on `branch` and return its raw output.
    pub async fn launch(&self, project: &str, branch: &str) -> Result<String, ScannerError> {
        info!(project, branch, "launching scan");
        let spec = self
            .config
            .cli()
            .args(["scan", "create", "--project-name", project, "-s"])
            .arg(self.config.source_path.display().to_string())
            .args(["--branch", branch, "--scan-types"])
            .arg(self.config.scan_types.join(","))
            .args(["--report-format", self.config.scan_report_format.as_str()])
            .args(["--output-name", self.config.scan_output_name.as_str()]);

        let output = self.runner.run(&spec).await?;
        debug!(project, output = %output, "scan create output");
        info!(project, "scan launched");
        Ok(output)
    }
}

/// Finds the scan id for a project in `scan list` output.
pub struct ScanLocator<R> {
    runner: Arc<R>,
    config: ScanToolConfig,
}

impl<R: CommandRunner> ScanLocator<R> {
    pub fn new(runner: Arc<R>, config: ScanToolConfig) -> Self {
        Self { runner, config }
    }

    /// Run `scan list` and extract the id for `project`.
    pub async fn locate(&self, project: &str) -> Result<ScanId, ScannerError> {
        let spec = self.config.cli().args(["scan", "list"]);
        let listing = self.runner.run(&spec).await?;

        let scan_id = extract_scan_id(&listing, project).ok_or_else(|| {
            ScannerError::ScanNotFound {
                project: project.to_owned(),
            }
        })?;
        info!(project, scan_id = %scan_id, "located scan");
        Ok(scan_id)
    }
}

/// First whitespace token of the first line containing `project`.
///
/// Matching is substring based, like project existence checks. Returns
/// `None` when no line matches or the matching line has no token.
pub fn extract_scan_id(listing: &str, project: &str) -> Option<ScanId> {
    listing
        .lines()
        .find(|line| line.contains(project))
        .and_then(|line| line.split_whitespace().next())
        .map(ScanId::new)
}
