//! Scan CLI credential setup.

use std::sync::Arc;

use tracing::info;

use crate::config::ScanToolConfig;
use crate::error::ScannerError;
use crate::runner::CommandRunner;

/// Stores the API key in the scan CLI's own configuration.
pub struct ApiKeyConfigurator<R> {
    runner: Arc<R>,
    config: ScanToolConfig,
}

impl<R: CommandRunner> ApiKeyConfigurator<R> {
    pub fn new(runner: Arc<R>, config: ScanToolConfig) -> Self {
        Self { runner, config }
    }

    /// Run `configure set api-key <key>`.
    ///
    /// The key is passed as a secret argument and never appears in logs or
    /// error messages.
    pub async fn set_api_key(&self, api_key: &str) -> Result<(), ScannerError> {
        info!("configuring scan tool API key");
        let spec = self
            .config
            .cli()
            .args(["configure", "set", "api-key"])
            .secret_arg(api_key);
        self.runner.run(&spec).await?;
        info!("scan tool API key configured");
        Ok(())
    }
}
