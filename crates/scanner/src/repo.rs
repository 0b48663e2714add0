//! Source checkout.
//!
//! The clone is skipped whenever the checkout path already exists. An
//! existing directory is reused as-is: it is not fetched, checked out to the
//! requested branch, or verified to be a clone of the configured URL.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::ScanToolConfig;
use crate::error::ScannerError;
use crate::runner::CommandRunner;

/// What [`RepositoryCloner::ensure_checkout`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutOutcome {
    /// `git clone` ran.
    Cloned,
    /// The checkout path already existed.
    Reused,
}

impl fmt::Display for CheckoutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloned => f.write_str("cloned"),
            Self::Reused => f.write_str("reused"),
        }
    }
}

/// Clones the target repository into the configured checkout path.
pub struct RepositoryCloner<R> {
    runner: Arc<R>,
    config: ScanToolConfig,
}

impl<R: CommandRunner> RepositoryCloner<R> {
    pub fn new(runner: Arc<R>, config: ScanToolConfig) -> Self {
        Self { runner, config }
    }

    /// Clone `repo_url` unless the checkout path already exists.
    pub async fn ensure_checkout(&self, repo_url: &str) -> Result<CheckoutOutcome, ScannerError> {
        let source_dir = self.config.source_dir();

        if tokio::fs::try_exists(&source_dir).await? {
            info!(path = %source_dir.display(), "source checkout already present, skipping clone");
            return Ok(CheckoutOutcome::Reused);
        }

        info!(url = repo_url, path = %source_dir.display(), "cloning repository");
        // `--` keeps a URL starting with `-` from being read as an option.
        let spec = self
            .config
            .git()
            .args(["clone", "--", repo_url])
            .arg(self.config.source_path.display().to_string());
        self.runner.run(&spec).await?;

        info!(path = %source_dir.display(), "repository cloned");
        Ok(CheckoutOutcome::Cloned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockCommandRunner;
    use std::path::PathBuf;

    fn config_in(dir: &std::path::Path) -> ScanToolConfig {
        ScanToolConfig {
            working_dir: dir.to_path_buf(),
            source_path: PathBuf::from("checkout"),
            ..ScanToolConfig::default()
        }
    }

    #[tokio::test]
    async fn clones_when_checkout_absent() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(MockCommandRunner::new());
        let cloner = RepositoryCloner::new(Arc::clone(&runner), config_in(dir.path()));

        let outcome = cloner
            .ensure_checkout("https://example.com/org/repo.git")
            .await
            .unwrap();

        assert_eq!(outcome, CheckoutOutcome::Cloned);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program(), "git");
        assert_eq!(
            calls[0].arg_values(),
            vec!["clone", "--", "https://example.com/org/repo.git", "checkout"]
        );
        assert_eq!(calls[0].cwd(), Some(dir.path()));
    }

    #[tokio::test]
    async fn reuses_existing_checkout_without_running_git() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("checkout")).unwrap();
        let runner = Arc::new(MockCommandRunner::new());
        let cloner = RepositoryCloner::new(Arc::clone(&runner), config_in(dir.path()));

        let outcome = cloner
            .ensure_checkout("https://example.com/org/repo.git")
            .await
            .unwrap();

        assert_eq!(outcome, CheckoutOutcome::Reused);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn clone_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(
            MockCommandRunner::new().fail_on(&["clone"], "fatal: repository not found"),
        );
        let cloner = RepositoryCloner::new(Arc::clone(&runner), config_in(dir.path()));

        let err = cloner
            .ensure_checkout("https://example.com/missing.git")
            .await
            .unwrap_err();
        assert!(err.stderr_contains("repository not found"));
    }

    #[test]
    fn outcome_display() {
        assert_eq!(CheckoutOutcome::Cloned.to_string(), "cloned");
        assert_eq!(CheckoutOutcome::Reused.to_string(), "reused");
    }
}
