use clap::Parser;

use cxflow_cli::cli::{Cli, Commands};
use cxflow_cli::commands;
use cxflow_cli::error::CliError;
use cxflow_cli::logging;
use cxflow_cli::output::OutputWriter;
use cxflow_core::config::{CxflowConfig, GeneralConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, exit_code = e.exit_code(), "cxflow failed");
            eprintln!("error: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Run(args) => {
            let mut config = CxflowConfig::load_or_default(&cli.config).await?;
            if let Some(level) = cli.log_level {
                config.general.log_level = level;
                config.validate()?;
            }
            logging::init_tracing(&config.general)
                .map_err(|e| CliError::Command(e.to_string()))?;

            commands::run::execute(args, &config, &writer).await
        }
        Commands::Config(args) => {
            // The file under inspection may be the broken one, so logging
            // for config commands uses built-in defaults.
            let mut general = GeneralConfig::default();
            if let Some(level) = cli.log_level {
                general.log_level = level;
            }
            logging::init_tracing(&general).map_err(|e| CliError::Command(e.to_string()))?;

            commands::config::execute(args, &cli.config, &writer).await
        }
    }
}
