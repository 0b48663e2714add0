//! `cxflow config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use cxflow_core::config::CxflowConfig;

use crate::cli::{ConfigAction, ConfigArgs, ConfigSection};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => {
            let report = validate(config_path).await;
            writer.render(&report)?;
            if !report.valid {
                return Err(CliError::Config("configuration is invalid".to_owned()));
            }
            Ok(())
        }
        ConfigAction::Show { section } => {
            let report = show(config_path, section).await?;
            writer.render(&report)?;
            Ok(())
        }
    }
}

/// Load and validate the configuration file.
///
/// The file must exist; environment overrides are applied before
/// validation, exactly as `run` would see them.
pub async fn validate(config_path: &Path) -> ConfigValidationReport {
    info!(path = %config_path.display(), "validating configuration");

    let errors = match CxflowConfig::load(config_path).await {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    };

    ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        errors,
    }
}

/// Effective configuration (defaults + file + env overrides).
///
/// A missing file falls back to defaults, as `run` does. Nothing is
/// redacted: the file holds no secrets, only the name of the password
/// variable.
pub async fn show(
    config_path: &Path,
    section: Option<ConfigSection>,
) -> Result<ConfigReport, CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = CxflowConfig::load_or_default(config_path).await?;

    let config_toml = match section {
        None => toml::to_string_pretty(&config),
        Some(ConfigSection::General) => toml::to_string_pretty(&config.general),
        Some(ConfigSection::Scanner) => toml::to_string_pretty(&config.scanner),
        Some(ConfigSection::Reports) => toml::to_string_pretty(&config.reports),
        Some(ConfigSection::Email) => toml::to_string_pretty(&config.email),
    }
    .map_err(|e| CliError::Command(format!("failed to serialize configuration: {e}")))?;

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section: section.map(|s| s.as_str().to_owned()),
        config_toml,
    })
}

/// Configuration display report.
///
/// `config_toml` is only used for text rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.section {
            Some(section) => writeln!(
                w,
                "Configuration {} (source: {})",
                format!("[{section}]").bold(),
                self.source
            )?,
            None => writeln!(w, "Configuration (source: {})", self.source.bold())?,
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Empty when valid.
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
