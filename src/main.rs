//! QuantumSynth CLI
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `models` - List available models
//! - `info` - Show version info
//!
//! Without a command a short welcome message is printed.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quantumsynth::{
    api::{create_router, AppState},
    config::AppConfig,
    dispatch::available_models,
    error::{QuantumSynthError, Result},
    observability,
};
use tracing::{info, warn};

/// QuantumSynth: quantum-inspired computation platform
#[derive(Parser)]
#[command(name = "quantumsynth")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./quantumsynth.toml or ./config/quantumsynth.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the QuantumSynth server
    ///
    /// Examples:
    ///   quantumsynth serve
    ///   quantumsynth serve --port 9000 --config prod.toml
    Serve {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List available models
    Models {
        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Show version and feature info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            println!("Welcome to QuantumSynth! Use --help to explore available commands.");
        },
        Some(Commands::Serve { host, port }) => {
            let (mut config, source) = AppConfig::resolve(cli.config.as_deref())?;
            if let Some(level) = cli.log {
                config.log.level = level;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            observability::init_logging(&config.log.level);
            source.log();
            serve(config).await?;
        },
        Some(Commands::Models { format }) => list_models(&format)?,
        Some(Commands::Info) => {
            println!("QuantumSynth v{}", quantumsynth::VERSION);
            println!("Quantum-inspired computation platform");
            println!();
            println!("Features:");
            println!("  - Labelled processing by mode");
            println!("  - Seeded noise and noise matrices");
            println!("  - Threshold collapse");
            println!("  - JSON and Prometheus metrics");
        },
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    let addr: SocketAddr =
        config
            .bind_address()
            .parse()
            .map_err(|e| QuantumSynthError::ConfigError {
                message: format!("Invalid address '{}': {e}", config.bind_address()),
            })?;

    if config.security.enable_auth {
        warn!("security.enable_auth is set but authentication is not enforced");
    }

    let default_mode = config.quantum.default_mode.clone();
    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, %default_mode, "QuantumSynth server is starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("QuantumSynth stopped. Goodbye.");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    warn!("Shutting down QuantumSynth gracefully...");
}

fn list_models(format: &str) -> Result<()> {
    let models = available_models();
    match format {
        "json" => {
            let json = serde_json::json!({ "models": models });
            println!("{json}");
        },
        "table" => {
            println!("MODEL");
            for model in models {
                println!("{model}");
            }
        },
        other => {
            return Err(QuantumSynthError::invalid_argument(format!(
                "unknown format '{other}', expected table or json"
            )));
        },
    }
    Ok(())
}
