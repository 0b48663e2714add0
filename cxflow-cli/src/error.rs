//! CLI-specific error types and exit code mapping

use cxflow_core::error::CxflowError;
use cxflow_notifier::NotifierError;
use cxflow_scanner::ScannerError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// An external tool (scan CLI or git) failed, could not start, or timed out.
    #[error("tool error: {0}")]
    Tool(String),

    /// No scan matched the project in the scan listing.
    #[error("lookup error: {0}")]
    ScanNotFound(String),

    /// Report email could not be composed or delivered.
    #[error("email error: {0}")]
    Email(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from cxflow-core.
    #[error("{0}")]
    Core(#[from] CxflowError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration error                       |
    /// | 3    | External tool command failed              |
    /// | 4    | No scan found for project                 |
    /// | 5    | Email failed (reports were generated)     |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Tool(_) => 3,
            Self::ScanNotFound(_) => 4,
            Self::Email(_) => 5,
            Self::Io(_) => 10,
            Self::Core(CxflowError::Config(_)) => 2,
            Self::Core(CxflowError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<ScannerError> for CliError {
    fn from(e: ScannerError) -> Self {
        match e {
            ScannerError::ScanNotFound { .. } => Self::ScanNotFound(e.to_string()),
            ScannerError::Config { .. } => Self::Config(e.to_string()),
            ScannerError::Io(io) => Self::Io(io),
            ScannerError::CommandFailed { .. }
            | ScannerError::Spawn { .. }
            | ScannerError::Timeout { .. } => Self::Tool(e.to_string()),
        }
    }
}

impl From<NotifierError> for CliError {
    fn from(e: NotifierError) -> Self {
        Self::Email(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxflow_core::error::ConfigError;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("bad value".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_tool_error() {
        let err = CliError::Tool("cx exited with 1".to_owned());
        assert_eq!(err.exit_code(), 3, "tool error should return exit code 3");
    }

    #[test]
    fn test_exit_code_scan_not_found() {
        let err = CliError::ScanNotFound("no scan".to_owned());
        assert_eq!(err.exit_code(), 4, "missing scan should return exit code 4");
    }

    #[test]
    fn test_exit_code_email_error() {
        let err = CliError::Email("connection refused".to_owned());
        assert_eq!(err.exit_code(), 5, "email error should return exit code 5");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        assert_eq!(CliError::Io(io_err).exit_code(), 10);
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("logging init failed".to_owned());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_core_errors_follow_kind() {
        let config: CliError = CxflowError::Config(ConfigError::FileNotFound {
            path: "cxflow.toml".to_owned(),
        })
        .into();
        assert_eq!(config.exit_code(), 2);

        let io: CliError =
            CxflowError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk")).into();
        assert_eq!(io.exit_code(), 10);
    }

    #[test]
    fn test_from_scanner_command_failed_is_tool_error() {
        let err: CliError = ScannerError::CommandFailed {
            command: "/usr/local/bin/cx scan list".to_owned(),
            status: Some(1),
            stderr: "unauthorized".to_owned(),
        }
        .into();
        assert!(matches!(err, CliError::Tool(_)));
        let msg = err.to_string();
        assert!(msg.contains("cx scan list"), "should keep the command text");
        assert!(msg.contains("unauthorized"), "should keep stderr");
    }

    #[test]
    fn test_from_scanner_timeout_and_spawn_are_tool_errors() {
        let timeout: CliError = ScannerError::Timeout {
            command: "git clone".to_owned(),
            secs: 5,
        }
        .into();
        assert_eq!(timeout.exit_code(), 3);

        let spawn: CliError = ScannerError::Spawn {
            command: "cx".to_owned(),
            reason: "No such file or directory".to_owned(),
        }
        .into();
        assert_eq!(spawn.exit_code(), 3);
    }

    #[test]
    fn test_from_scanner_scan_not_found() {
        let err: CliError = ScannerError::ScanNotFound {
            project: "proj-z".to_owned(),
        }
        .into();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("proj-z"));
    }

    #[test]
    fn test_from_notifier_error() {
        let err: CliError = NotifierError::Transport("535 auth failed".to_owned()).into();
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("535 auth failed"));
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = err.to_string();
        assert!(display_str.contains("configuration error"));
        assert!(display_str.contains("invalid TOML syntax"));
    }
}
