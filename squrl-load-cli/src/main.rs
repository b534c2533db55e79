mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands};
use squrl_load_config::domains::logging::LogLevel;
use squrl_load_config::{ConfigLoader, LoadConfig};
use squrl_load_core::{InMemorySink, Processor, SeedPool};
use squrl_load_http::{run_sessions, ClientConfig, ProbeClient};
use squrl_load_logging::init_logging_from_config;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error, info, warn};

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    File(PathBuf),
    /// `--config` named a file that does not exist
    MissingFile(PathBuf),
    Environment,
}

impl ConfigSource {
    /// Logging is only installed after the configuration is known, so the
    /// source is reported afterwards.
    fn report(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from: {:?}", path),
            ConfigSource::MissingFile(path) => {
                warn!("Configuration file not found: {:?}. Using defaults.", path)
            }
            ConfigSource::Environment => {
                debug!("No configuration file specified. Loaded from environment or defaults.")
            }
        }
    }
}

/// Load configuration from file or use defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<(LoadConfig, ConfigSource)> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) if path.exists() => {
            let config = loader
                .from_file(path)
                .context(format!("Failed to load configuration from {:?}", path))?;
            Ok((config, ConfigSource::File(path.clone())))
        }
        Some(path) => {
            let config = loader
                .from_env()
                .context("Failed to load configuration from environment")?;
            Ok((config, ConfigSource::MissingFile(path.clone())))
        }
        None => {
            let config = loader
                .from_env()
                .context("Failed to load configuration from environment")?;
            Ok((config, ConfigSource::Environment))
        }
    }
}

/// Read seed short codes, one per line. Blank lines and `#` comments are skipped.
fn read_seed_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {:?}", path))?;

    Ok(parse_seed_codes(&content))
}

fn parse_seed_codes(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

async fn handle_run(
    config: LoadConfig,
    sessions: usize,
    base_url: Option<&String>,
    seeds: Option<&PathBuf>,
) -> Result<()> {
    let mut client_config = ClientConfig::from(config.target.clone());
    if let Some(base_url) = base_url {
        client_config.base_url = base_url.clone();
    }
    let client = ProbeClient::new(client_config).context("Failed to create HTTP client")?;

    let seed_codes = match seeds {
        Some(path) => read_seed_file(path)?,
        None => config.probe.seed_codes.clone(),
    };
    let seed_pool = SeedPool::from_codes(seed_codes).context("Invalid seed pool")?;

    let processor = Processor::from_config(&config.probe);
    let sink = InMemorySink::new();

    info!(
        sessions,
        seeds = seed_pool.len(),
        "Running journeys against {}",
        client.base_url()
    );
    let outcomes = run_sessions(&client, &processor, &seed_pool, &sink, sessions).await;

    let requests: usize = outcomes.iter().map(|o| o.requests_sent).sum();
    let transport_errors: usize = outcomes.iter().map(|o| o.transport_errors()).sum();
    info!(requests, transport_errors, "All sessions finished");
    if transport_errors == requests && requests > 0 {
        warn!("No request reached {}", client.base_url());
    }

    let snapshot = serde_json::to_string_pretty(&sink.snapshot())
        .context("Failed to serialize metrics snapshot")?;
    println!("{}", snapshot);

    Ok(())
}

/// Handle configuration validation
fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow!("Configuration file not found: {:?}", config_file));
    }

    match ConfigLoader::new().from_file(config_file) {
        Ok(_config) => {
            println!("Configuration file is valid");
            Ok(())
        }
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            Err(e).context(format!("Invalid configuration in {:?}", config_file))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, source) = load_config(cli.config.as_ref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level =
            LogLevel::from_str(level).map_err(|_| anyhow!("Invalid log level '{}'", level))?;
    }
    init_logging_from_config(&config.logging)?;
    source.report();

    match &cli.command {
        Commands::Run {
            sessions,
            base_url,
            seeds,
        } => handle_run(config, *sessions, base_url.as_ref(), seeds.as_ref()).await,
        Commands::Config { config_cmd } => match config_cmd {
            ConfigCommands::Validate { config_file } => {
                let path = config_file
                    .as_ref()
                    .or(cli.config.as_ref())
                    .ok_or_else(|| anyhow!("No configuration file given, use --config-file"))?;
                handle_config_validate(path)
            }
            ConfigCommands::Sample => {
                print!("{}", LoadConfig::generate_sample());
                Ok(())
            }
        },
    }
}
