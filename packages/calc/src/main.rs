use anyhow::{Context, Result};
use calc_core::Key;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::prelude::*;

mod backend;
mod cli;
mod config;
mod tui;

use crate::backend::Backend;
use crate::config::{BackendKind, CalcConfig, FileConfig};

#[derive(Parser)]
#[command(name = "calc")]
#[command(about = "Keypad calculator with a local or HTTP arithmetic backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Custom config directory (defaults to the platform config dir + /calc)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Where arithmetic happens (overrides config)
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendKind>,

    /// Base URL of the HTTP arithmetic backend (overrides config)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive keypad in the terminal (default)
    Tui,

    /// Press keys in order and print the final display
    Press(PressArgs),

    /// Run the HTTP arithmetic backend
    Serve(ServeArgs),
}

#[derive(Parser)]
struct PressArgs {
    /// Keypad labels: 0-9 . + - * / = C
    #[arg(required = true, allow_hyphen_values = true)]
    keys: Vec<Key>,

    /// Print the whole calculator state as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ServeArgs {
    /// Port to listen on (0 = auto-select)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(short = 'b', long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CalcConfig::new(cli.config_dir.clone())?;
    let mut file_config = config.file_config()?;
    apply_overrides(&mut file_config, &cli);

    match cli.command {
        None | Some(Commands::Tui) => {
            init_file_logging(cli.debug, &config)?;
            let backend = Backend::from_config(&file_config.backend);
            tui::run(backend).await
        }
        Some(Commands::Press(args)) => {
            init_stderr_logging(cli.debug);
            let backend = Backend::from_config(&file_config.backend);
            cli::press_command(backend, args.keys, args.json).await
        }
        Some(Commands::Serve(args)) => {
            init_stderr_logging(cli.debug);
            let mut server = file_config.server;
            if let Some(host) = args.host {
                server.host = host;
            }
            if let Some(port) = args.port {
                server.port = port;
            }
            cli::serve_command(&server).await
        }
    }
}

/// CLI flags win over config.toml and env.
fn apply_overrides(fc: &mut FileConfig, cli: &Cli) {
    if let Some(kind) = cli.backend {
        fc.backend.kind = kind;
    }
    if let Some(url) = &cli.backend_url {
        fc.backend.url = url.clone();
    }
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "calc=debug,calc_core=debug,arithmetic_backend=debug,tower_http=debug,info"
    } else {
        "calc=info,calc_core=info,arithmetic_backend=info,warn"
    }
}

fn env_filter(debug: bool) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive(debug)))
}

fn init_stderr_logging(debug: bool) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(debug))
        .init();
}

// The keypad owns the terminal, so logs go to a file instead.
fn init_file_logging(debug: bool, config: &CalcConfig) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {:?}", config.log_path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(env_filter(debug))
        .init();

    info!(log = ?config.log_path, "calc keypad starting");
    Ok(())
}
