use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use mailing_list::{Config, Database, GrpcServer, JsonServer, MailingList};

/// Mailing list registry: JSON/HTTP and gRPC APIs over one SQLite table.
#[derive(Parser, Debug)]
#[command(name = "mailing-list", version, about)]
struct Args {
    /// Path to the TOML configuration file [default: config.toml, optional].
    #[arg(long)]
    config: Option<String>,
}

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration; only an explicit --config has to exist
    let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let loaded = match &args.config {
        Some(path) => Config::load(path),
        None => Config::load_or_default(path),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = mailing_list::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        mailing_list::logging::init_console_only(&config.logging.level);
    }

    info!("Mailing list registry starting");

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {}", config.database.path, e);
            return ExitCode::FAILURE;
        }
    };
    let registry = MailingList::new(Arc::new(db));

    match registry.subscriber_count().await {
        Ok(count) => info!(subscribers = count, "Database ready"),
        Err(e) => warn!("Failed to count subscribers: {}", e),
    }

    let json_server = match JsonServer::new(&config.json, registry.clone()) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure JSON API: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let grpc_server = match GrpcServer::new(&config.grpc, registry) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure gRPC API: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        json = %json_server.addr(),
        grpc = %grpc_server.addr(),
        "Starting API servers"
    );

    let json_task: JoinHandle<mailing_list::Result<()>> = tokio::spawn(json_server.run());
    let grpc_task: JoinHandle<mailing_list::Result<()>> = tokio::spawn(grpc_server.run());

    // Either server stopping ends the process
    let (name, outcome) = tokio::select! {
        outcome = json_task => ("JSON API", outcome),
        outcome = grpc_task => ("gRPC API", outcome),
    };

    match outcome {
        Ok(Ok(())) => error!("{} server stopped", name),
        Ok(Err(e)) => error!("{} server error: {}", name, e),
        Err(e) => error!("{} server task failed: {}", name, e),
    }

    ExitCode::FAILURE
}
