//! Project lookup and creation.
//!
//! Project existence is decided by substring search over the raw
//! `project list` output. A project named `api` is therefore reported as
//! existing when only `api-gateway` is present. The scan CLI offers no
//! structured output contract this workflow relies on, so the behavior is
//! kept and documented rather than guessed around.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ScanToolConfig;
use crate::error::ScannerError;
use crate::runner::CommandRunner;

/// Failure text the scan CLI emits when creating a duplicate project.
const ALREADY_EXISTS: &str = "already exists";

/// Lists, checks and creates projects through the scan CLI.
pub struct ProjectManager<R> {
    runner: Arc<R>,
    config: ScanToolConfig,
}

impl<R: CommandRunner> ProjectManager<R> {
    pub fn new(runner: Arc<R>, config: ScanToolConfig) -> Self {
        Self { runner, config }
    }

    /// Raw `project list` output.
    pub async fn list(&self) -> Result<String, ScannerError> {
        debug!("listing projects");
        let spec = self.config.cli().args(["project", "list"]);
        self.runner.run(&spec).await
    }

    /// Whether `name` occurs anywhere in the project list output.
    pub async fn exists(&self, name: &str) -> Result<bool, ScannerError> {
        let projects = self.list().await?;
        let found = projects.contains(name);
        debug!(project = name, found, "checked project existence");
        Ok(found)
    }

    /// Create `name`.
    ///
    /// A failure whose stderr says the project already exists counts as
    /// success, so creation is idempotent. Any other failure propagates.
    pub async fn create(&self, name: &str) -> Result<(), ScannerError> {
        info!(project = name, "creating project");
        let spec = self
            .config
            .cli()
            .args(["project", "create", "--project-name", name]);

        match self.runner.run(&spec).await {
            Ok(output) => {
                if !output.is_empty() {
                    debug!(project = name, output = %output, "project create output");
                }
                info!(project = name, "project created");
                Ok(())
            }
            Err(e) if e.stderr_contains(ALREADY_EXISTS) => {
                info!(project = name, "project already exists, skipping creation");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Check-then-create. Returns `true` when `create` was invoked.
    pub async fn ensure(&self, name: &str) -> Result<bool, ScannerError> {
        if self.exists(name).await? {
            info!(project = name, "project already exists");
            return Ok(false);
        }
        self.create(name).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockCommandRunner;

    fn manager(runner: &Arc<MockCommandRunner>) -> ProjectManager<MockCommandRunner> {
        ProjectManager::new(Arc::clone(runner), ScanToolConfig::default())
    }

    #[tokio::test]
    async fn exists_true_for_exact_name() {
        let runner = Arc::new(MockCommandRunner::new().on(&["project", "list"], "foo\nbar"));
        assert!(manager(&runner).exists("foo").await.unwrap());
    }

    #[tokio::test]
    async fn exists_true_for_substring_of_longer_name() {
        let runner = Arc::new(MockCommandRunner::new().on(&["project", "list"], "foobar-service"));
        assert!(manager(&runner).exists("foo").await.unwrap());
    }

    #[tokio::test]
    async fn exists_false_when_absent() {
        let runner = Arc::new(MockCommandRunner::new().on(&["project", "list"], "alpha\nbeta"));
        assert!(!manager(&runner).exists("foo").await.unwrap());
    }

    #[tokio::test]
    async fn exists_propagates_list_failure() {
        let runner = Arc::new(MockCommandRunner::new().fail_on(&["project", "list"], "unauthorized"));
        let err = manager(&runner).exists("foo").await.unwrap_err();
        assert!(matches!(err, ScannerError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn create_passes_name_as_single_argument() {
        let runner = Arc::new(MockCommandRunner::new());
        manager(&runner).create("my project").await.unwrap();
        let calls = runner.calls();
        assert_eq!(
            calls[0].arg_values(),
            vec!["project", "create", "--project-name", "my project"]
        );
    }

    #[tokio::test]
    async fn create_treats_already_exists_as_success() {
        let runner = Arc::new(
            MockCommandRunner::new()
                .fail_on(&["project", "create"], "Error: project foo already exists"),
        );
        manager(&runner).create("foo").await.unwrap();
    }

    #[tokio::test]
    async fn create_propagates_other_failures() {
        let runner =
            Arc::new(MockCommandRunner::new().fail_on(&["project", "create"], "quota exceeded"));
        let err = manager(&runner).create("foo").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn ensure_creates_missing_project_once() {
        let runner = Arc::new(MockCommandRunner::new().on(&["project", "list"], "other"));
        let created = manager(&runner).ensure("foo").await.unwrap();
        assert!(created);
        assert_eq!(runner.count(&["project", "create"]), 1);
    }

    #[tokio::test]
    async fn ensure_skips_create_for_existing_project() {
        let runner = Arc::new(MockCommandRunner::new().on(&["project", "list"], "foo"));
        let created = manager(&runner).ensure("foo").await.unwrap();
        assert!(!created);
        assert_eq!(runner.count(&["project", "create"]), 0);
    }
}
