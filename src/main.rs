use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error, info, trace};
use tracing_subscriber::EnvFilter;

use mentorhub::api::ApiServer;
use mentorhub::config::ConfigLoader;
use mentorhub::error::MarketplaceError;
use mentorhub::services::AppState;
use mentorhub::storage::BackendType;

/// Startup mentorship marketplace backend
#[derive(Parser)]
#[command(name = "mentorhub", version)]
#[command(about = "Mentor directory, session bookings and idea analysis over REST", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (defaults to $MENTORHUB_CONFIG)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API (default command)
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep all data in memory; nothing survives a restart
        #[arg(long)]
        ephemeral: bool,
    },
    /// Build the weekly bookings report
    WeeklyReport {
        /// Write the JSON report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also mail the report to the admin address
        #[arg(long)]
        send: bool,
    },
    /// Print the effective configuration as TOML
    ShowConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,tower=debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 3)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("mentorhub started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        ephemeral: false,
    });

    if let Err(e) = run(command, cli.config).await {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        let code = e
            .downcast_ref::<MarketplaceError>()
            .map(MarketplaceError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(command: Commands, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = ConfigLoader::new(config_path).load().await?;

    match command {
        Commands::Serve { port, ephemeral } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if ephemeral {
                config.storage.backend = BackendType::Memory;
            }
            let state = AppState::from_config(config).await?;
            ApiServer::new(state).start().await
        }
        Commands::WeeklyReport { output, send } => {
            let state = AppState::from_config(config).await?;
            let reports = state.reports();
            let report = if send {
                let (report, mailed) = reports.send_weekly().await?;
                if !mailed {
                    anyhow::bail!("Weekly report built but could not be mailed");
                }
                report
            } else {
                reports.weekly().await?
            };

            let json = report.to_json()?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    info!("Weekly report written to {}", path.display());
                }
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::ShowConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
