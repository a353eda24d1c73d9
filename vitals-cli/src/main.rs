mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vitals_core::{Config, CycleOutcome, HealthCheck, Monitor, Reporter, EXIT_INTERNAL_ERROR};
use vitals_provider::{FixedProvider, MetricsProvider};
use vitals_std::SysinfoProvider;

#[derive(Parser)]
#[command(name = "vitals", version, about = "Host health checks")]
struct Cli {
    /// Config file (defaults to ./vitals.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single health check and exit with its status
    Check {
        /// Replay a captured JSON sample set instead of sampling this host
        #[arg(long)]
        samples: Option<PathBuf>,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,

        /// Don't write the snapshot or the log line
        #[arg(long)]
        no_report: bool,
    },

    /// Check repeatedly until interrupted
    Run {
        /// Seconds between checks
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many checks
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },

    /// Print the configuration as YAML
    Config {
        /// Print built-in defaults instead of the loaded file
        #[arg(long)]
        default: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load_or_default()),
    }
}

fn init_tracing(config: &Config, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn provider(config: &Config, samples: Option<&PathBuf>) -> Result<Arc<dyn MetricsProvider>> {
    match samples {
        Some(path) => {
            let provider = FixedProvider::from_file(path)
                .await
                .with_context(|| format!("Failed to read samples from {}", path.display()))?;
            info!("Replaying samples from {}", path.display());
            Ok(Arc::new(provider))
        }
        None => Ok(Arc::new(SysinfoProvider::from_config(&config.provider))),
    }
}

fn health_check(config: &Config, provider: Arc<dyn MetricsProvider>) -> HealthCheck {
    HealthCheck::new(provider).with_scorer(config.health.scorer())
}

async fn check(config: Config, samples: Option<PathBuf>, json: bool, no_report: bool) -> Result<i32> {
    let provider = provider(&config, samples.as_ref()).await?;
    let check = health_check(&config, provider);

    let reporter = if no_report {
        Reporter::new()
    } else {
        Reporter::from_config(&config.report)
    };

    let outcome = check.run_cycle().await;
    reporter.report(&outcome).await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else {
        output::print_outcome(&outcome);
    }

    Ok(outcome.exit_code())
}

async fn run(config: Config) -> Result<i32> {
    let provider = provider(&config, None).await?;
    let check = health_check(&config, provider);
    let reporter = Reporter::from_config(&config.report);
    let monitor = Monitor::from_config(check, reporter, &config.monitor);

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => trigger.cancel(),
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    let summary = monitor.run(shutdown).await;
    Ok(summary.last.as_ref().map_or(0, CycleOutcome::exit_code))
}

async fn execute(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Config { default } => {
            let config = if default {
                Config::default()
            } else {
                load_config(cli.config.as_ref())?
            };
            print!("{}", config.to_yaml()?);
            Ok(0)
        }
        Command::Check {
            samples,
            json,
            no_report,
        } => {
            let config = load_config(cli.config.as_ref())?;
            init_tracing(&config, cli.verbose);
            check(config, samples, json, no_report).await
        }
        Command::Run { interval, count } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(secs) = interval {
                config = config.with_interval_secs(secs);
            }
            if let Some(count) = count {
                config = config.with_max_cycles(count);
            }
            config.validate()?;
            init_tracing(&config, cli.verbose);
            run(config).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            EXIT_INTERNAL_ERROR
        }
    };

    std::process::exit(code);
}
