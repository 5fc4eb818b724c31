//! Formbase service - starts the HTTP front door and, when a database path is
//! given, opens the process-wide storage gateway.

use clap::Parser;
use std::path::PathBuf;

use formbase::config;
use formbase::gateway::{self, GatewayConfig};
use formbase::server;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "formbase")]
#[command(version = "0.0.1")]
#[command(about = "Backend service skeleton - generic CRUD gateway over SQLite plus an HTTP front door")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to a TOML config file (default: formbase.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the database file (opens the shared gateway at startup)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to a SQL setup script executed when the database is opened
    #[arg(short, long)]
    init_script: Option<PathBuf>,

    /// Port to listen on (overrides config file and the PORT env var)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    let database = cli
        .database
        .or_else(|| file_config.database.clone().map(PathBuf::from));
    let init_script = cli
        .init_script
        .or_else(|| file_config.init_script.clone().map(PathBuf::from));
    let port = match cli.port.or(file_config.port) {
        Some(port) => port,
        None => config::port_from_env()?,
    };

    match database {
        Some(db_path) => {
            let mut gateway_config = GatewayConfig::new(db_path);
            if let Some(script_path) = &init_script {
                gateway_config =
                    gateway_config.with_init_script(std::fs::read_to_string(script_path)?);
            }
            gateway::shared::initialize(&gateway_config)?;
        }
        None if init_script.is_some() => {
            anyhow::bail!("--init-script requires --database");
        }
        None => {
            tracing::warn!("no database configured; storage gateway left uninitialized");
        }
    }

    server::start_server(port).await
}
