//! Result report generation.
//!
//! Two `results show` invocations write the JSON and SARIF reports for a
//! scan. The returned paths are computed from the configured directory and
//! output names; the files themselves are not checked, so a tool that exits
//! successfully without writing surfaces later as an attachment error.

use std::sync::Arc;

use cxflow_core::types::{ReportFile, ReportFormat, ScanId};
use tracing::info;

use crate::config::ScanToolConfig;
use crate::error::ScannerError;
use crate::runner::CommandRunner;

/// Asks the scan CLI to write result reports for a scan.
pub struct ReportFetcher<R> {
    runner: Arc<R>,
    config: ScanToolConfig,
}

impl<R: CommandRunner> ReportFetcher<R> {
    pub fn new(runner: Arc<R>, config: ScanToolConfig) -> Self {
        Self { runner, config }
    }

    /// Write the JSON then the SARIF report for `scan_id`.
    ///
    /// Returns `[json, sarif]` in that order. A failure of the JSON request
    /// stops before the SARIF request is made.
    pub async fn fetch(&self, scan_id: &ScanId) -> Result<Vec<ReportFile>, ScannerError> {
        let json = self
            .fetch_one(scan_id, ReportFormat::Json, &self.config.json_output_name)
            .await?;
        let sarif = self
            .fetch_one(scan_id, ReportFormat::Sarif, &self.config.sarif_output_name)
            .await?;
        Ok(vec![json, sarif])
    }

    async fn fetch_one(
        &self,
        scan_id: &ScanId,
        format: ReportFormat,
        output_name: &str,
    ) -> Result<ReportFile, ScannerError> {
        info!(scan_id = %scan_id, format = %format, "generating report");
        let spec = self
            .config
            .cli()
            .args(["results", "show", "--scan-id", scan_id.as_str()])
            .args(["--report-format", format.as_str()])
            .args(["--output-name", output_name, "--output-path"])
            .arg(self.config.report_dir.display().to_string());
        self.runner.run(&spec).await?;

        let report = ReportFile::in_dir(&self.config.report_dir, output_name, format);
        info!(path = %report.path.display(), "report generated");
        Ok(report)
    }
}
