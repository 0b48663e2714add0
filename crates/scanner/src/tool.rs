//! Facade over the scan CLI components.
//!
//! [`ScanTool`] owns one runner and one configuration and hands out the
//! per-step components, all sharing that runner.

use std::sync::Arc;

use crate::auth::ApiKeyConfigurator;
use crate::config::ScanToolConfig;
use crate::project::ProjectManager;
use crate::repo::RepositoryCloner;
use crate::report::ReportFetcher;
use crate::runner::{CommandRunner, ProcessRunner};
use crate::scan::{ScanLauncher, ScanLocator};

/// Entry point for every scan-tool and git operation of the workflow.
pub struct ScanTool<R> {
    runner: Arc<R>,
    config: ScanToolConfig,
}

impl ScanTool<ProcessRunner> {
    /// Build a tool that runs real processes with the configured timeout.
    pub fn with_process_runner(config: ScanToolConfig) -> Self {
        let runner = ProcessRunner::new(config.command_timeout);
        Self::new(Arc::new(runner), config)
    }
}

impl<R: CommandRunner> ScanTool<R> {
    pub fn new(runner: Arc<R>, config: ScanToolConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &ScanToolConfig {
        &self.config
    }

    pub fn auth(&self) -> ApiKeyConfigurator<R> {
        ApiKeyConfigurator::new(Arc::clone(&self.runner), self.config.clone())
    }

    pub fn projects(&self) -> ProjectManager<R> {
        ProjectManager::new(Arc::clone(&self.runner), self.config.clone())
    }

    pub fn repository(&self) -> RepositoryCloner<R> {
        RepositoryCloner::new(Arc::clone(&self.runner), self.config.clone())
    }

    pub fn launcher(&self) -> ScanLauncher<R> {
        ScanLauncher::new(Arc::clone(&self.runner), self.config.clone())
    }

    pub fn locator(&self) -> ScanLocator<R> {
        ScanLocator::new(Arc::clone(&self.runner), self.config.clone())
    }

    pub fn reports(&self) -> ReportFetcher<R> {
        ReportFetcher::new(Arc::clone(&self.runner), self.config.clone())
    }
}
