//! Multi-cloud deployment manager CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use multicloud_deployer::config::{self, ConfigStore, RootConfig, DEFAULT_CONFIG_FILE};
use multicloud_deployer::connectors::{ProcessExecutor, RunnerInstance};
use multicloud_deployer::deployment::{
    check_prerequisites, required_tools, DeploymentStatus, HealthProber, MonitoringInstaller,
    Orchestrator,
};
use multicloud_deployer::services::{NotificationDispatcher, ReportGenerator};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "deployment.log";

/// Multi-cloud deployment manager
#[derive(Parser)]
#[command(name = "multicloud-deployer")]
#[command(about = "Deploy and monitor the application across cloud providers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cloud provider to target
    #[arg(long, value_enum, default_value = "all", global = true)]
    provider: ProviderArg,

    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Deploy to the targeted providers and publish a report
    Deploy,
    /// Show pod status per provider
    Status,
    /// Probe the deployed services over HTTP
    Health,
    /// Install the monitoring stack
    Monitor,
    /// Collect current status into a report without deploying
    Report,
    /// Print the effective configuration
    Config,
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
enum ProviderArg {
    Aws,
    Azure,
    Gcp,
    All,
}

impl ProviderArg {
    fn targets(&self, config: &RootConfig) -> Vec<String> {
        match self {
            ProviderArg::Aws => vec!["aws".to_string()],
            ProviderArg::Azure => vec!["azure".to_string()],
            ProviderArg::Gcp => vec!["gcp".to_string()],
            ProviderArg::All => config.provider_ids(),
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    let file_layer = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)
    {
        Ok(file) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        ),
        Err(e) => {
            eprintln!("Failed to open {}: {}", LOG_FILE, e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    config::load_env();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Arc::new(
        ConfigStore::new(&cli.config)
            .load()
            .context("Failed to load configuration")?,
    );

    if cli.dry_run {
        debug!("--dry-run was given; it does not change execution");
    }

    let runner: RunnerInstance = Arc::new(ProcessExecutor::new());

    let targets = cli.provider.targets(&config);

    let tools = required_tools(&targets);
    if let Err(e) = check_prerequisites(runner.as_ref(), tools.as_slice()).await {
        error!("{}", e);
        error!("Prerequisites not met. Please install required tools.");
        return Ok(ExitCode::from(1));
    }

    match cli.command {
        Commands::Deploy => {
            let orchestrator = Orchestrator::new(Arc::clone(&runner));
            let statuses = if cli.provider == ProviderArg::All {
                orchestrator.run_all(Arc::clone(&config)).await
            } else {
                let mut statuses = Vec::with_capacity(targets.len());
                for provider_id in &targets {
                    statuses.push(orchestrator.run_one(&config, provider_id).await);
                }
                statuses
            };

            let report = publish_report(&statuses)?;
            NotificationDispatcher::new()
                .notify(config.monitoring.slack_webhook.as_deref(), &report)
                .await;
        }
        Commands::Status => {
            let orchestrator = Orchestrator::new(Arc::clone(&runner));
            for provider_id in &targets {
                let status = orchestrator.collect_status(&config, provider_id).await;
                println!(
                    "{}: {} - {}",
                    provider_id.to_uppercase(),
                    status.state,
                    status.message
                );
            }
        }
        Commands::Health => {
            let prober = HealthProber::new();
            for provider_id in &targets {
                let healthy = match config.provider(provider_id) {
                    Some(provider) => prober.probe(provider).await.is_healthy(),
                    None => {
                        warn!("Provider '{}' is not configured", provider_id);
                        false
                    }
                };
                let label = if healthy { "HEALTHY" } else { "UNHEALTHY" };
                println!("{}: {}", provider_id.to_uppercase(), label);
            }
        }
        Commands::Monitor => {
            let installer = MonitoringInstaller::new(Arc::clone(&runner));
            let mut all_installed = true;
            for provider_id in &targets {
                let result = match config.provider(provider_id) {
                    Some(provider) => installer.install(&config, provider).await,
                    None => Err(multicloud_deployer::AppError::ConfigurationError(format!(
                        "Provider '{}' is not configured",
                        provider_id
                    ))),
                };
                if let Err(e) = result {
                    error!("Monitoring setup failed for {}: {}", provider_id, e);
                    all_installed = false;
                }
            }
            if all_installed {
                println!("Monitoring stack deployed successfully");
            } else {
                println!("Monitoring stack deployment incomplete, see {}", LOG_FILE);
            }
        }
        Commands::Report => {
            let orchestrator = Orchestrator::new(Arc::clone(&runner));
            let mut statuses = Vec::with_capacity(targets.len());
            for provider_id in &targets {
                statuses.push(orchestrator.collect_status(&config, provider_id).await);
            }
            publish_report(&statuses)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("{}", config::to_yaml(&config)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Print the report and save it next to the working directory
fn publish_report(statuses: &[DeploymentStatus]) -> Result<String> {
    let report = ReportGenerator::render(statuses);
    println!("{}", report);
    ReportGenerator::write_report(Path::new("."), &report).context("Failed to save report")?;
    Ok(report)
}
