use anyhow::{Context, Result};
use monorepo_diff::cli::commands::{UploadCommand, ValidateCommand};
use monorepo_diff::cli::output::*;
use monorepo_diff::cli::{Cli, Command};
use monorepo_diff::{Driver, PluginConfig, ShellRunner};
use tracing::{debug, error};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    match &cli.command {
        Command::Upload(cmd) => upload(cmd, cli.verbose).await?,
        Command::Validate(cmd) => validate(cmd, cli.verbose)?,
    }

    Ok(())
}

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "MONOREPO_DIFF_LOG";

fn init_logging(verbose: bool, config_level: &str) -> Result<()> {
    // Logs go to stderr; stdout carries the generated pipeline
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(verbose, config_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    Ok(())
}

/// --verbose wins, then MONOREPO_DIFF_LOG, then the plugin's log_level
fn log_filter(verbose: bool, config_level: &str) -> EnvFilter {
    if verbose {
        return EnvFilter::new(LevelFilter::DEBUG.to_string());
    }
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config_level_filter(config_level).to_string()))
}

fn config_level_filter(level: &str) -> LevelFilter {
    match level.trim() {
        "" => LevelFilter::INFO,
        level => level.parse().unwrap_or(LevelFilter::INFO),
    }
}

async fn upload(cmd: &UploadCommand, verbose: bool) -> Result<()> {
    let config = PluginConfig::from_plugins_json(&cmd.config)
        .context("Failed to load plugin configuration")?;
    init_logging(verbose, &config.log_level)?;
    debug!(
        "Loaded plugin config: diff '{}', {} watch rules",
        config.diff,
        config.watch.len()
    );

    let driver = Driver::new(ShellRunner::new(), cmd.driver_options());

    match driver.run(&config).await {
        Ok(outcome) => {
            eprintln!("{}", format_outcome(&outcome));
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", CROSS, style("monorepo-diff failed").red());
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn validate(cmd: &ValidateCommand, verbose: bool) -> Result<()> {
    println!("{} Validating plugin configuration...", INFO);

    match PluginConfig::from_plugins_json(&cmd.config) {
        Ok(config) => {
            init_logging(verbose, &config.log_level)?;
            println!("{} Plugin configuration is valid!", CHECK);
            for line in format_config_summary(&config) {
                println!("{}", line);
            }

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
