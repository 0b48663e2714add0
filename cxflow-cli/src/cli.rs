//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O. Workflow inputs that used to
//! be typed at a prompt are flags with environment fallbacks.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// cxflow -- run a SAST scan, collect the reports and email them.
///
/// Use `cxflow <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "cxflow", version, about, long_about = None)]
pub struct Cli {
    /// Path to the cxflow.toml configuration file.
    #[arg(short, long, default_value = "cxflow.toml", env = "CXFLOW_CONFIG")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scan workflow end to end.
    Run(RunArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- run ----

/// Configure, scan, fetch reports and notify.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project name in the scan platform.
    #[arg(long, env = "CXFLOW_PROJECT", value_parser = non_empty)]
    pub project: String,

    /// Branch to scan.
    #[arg(long, env = "CXFLOW_BRANCH", value_parser = non_empty, required_unless_present = "scan_id")]
    pub branch: Option<String>,

    /// Repository to clone when the source checkout is absent.
    #[arg(long, env = "CXFLOW_REPO_URL", value_parser = non_empty, required_unless_present = "scan_id")]
    pub repo_url: Option<String>,

    /// API key stored with `configure set api-key`. Skipped when absent.
    #[arg(long, env = "CXFLOW_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Fetch reports for an existing scan instead of launching one.
    #[arg(long, value_parser = non_empty)]
    pub scan_id: Option<String>,

    /// Do not send the report email.
    #[arg(long)]
    pub no_email: bool,
}

// ---- config ----

/// Manage cxflow configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only one section.
        #[arg(long)]
        section: Option<ConfigSection>,
    },
}

/// Top-level sections of cxflow.toml.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigSection {
    General,
    Scanner,
    Reports,
    Email,
}

impl ConfigSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Scanner => "scanner",
            Self::Reports => "reports",
            Self::Email => "email",
        }
    }
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("value must not be empty".to_owned())
    } else {
        Ok(value.to_owned())
    }
}
