//! munezd: the Munez daemon.
//!
//! Serves the chat fallback orchestrator over HTTP for the frontend.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use munez::config::{Config, Credentials, mask_secret};
use munez::server::{AppState, build_app};
use munez::{FallbackOrchestrator, MunezError, ProviderKind, ProviderRegistry};

/// Munez daemon: chat backend with LLM provider fallback.
#[derive(Parser)]
#[command(name = "munezd")]
#[command(version = munez::PKG_VERSION)]
#[command(about = "Munez chat backend daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to (overrides the config file).
    #[arg(short, long, env = "MUNEZ_ADDRESS")]
    address: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,

    /// Show which providers are configured, in fallback order
    Providers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?;
    let credentials = Credentials::from_env();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, credentials, args.address).await,
        Command::Providers => {
            print_providers(&config, &credentials);
            Ok(())
        }
    }
}

async fn serve(
    config: Config,
    credentials: Credentials,
    address: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let attempt_timeout = config.dispatch.attempt_timeout();
    let registry = ProviderRegistry::build(&config.providers, &credentials, attempt_timeout)?;
    let orchestrator =
        FallbackOrchestrator::new(registry.into()).with_attempt_timeout(attempt_timeout);

    let address = address.unwrap_or_else(|| config.server.address.clone());
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| MunezError::Configuration(format!("Invalid address {address:?}: {e}")))?;

    let sweep = config.dispatch.worst_case_sweep(orchestrator.registry().len());
    if config.server.request_timeout() < sweep {
        warn!(
            request_timeout = ?config.server.request_timeout(),
            worst_case_sweep = ?sweep,
            "request timeout is shorter than a full provider sweep; slow sweeps will end in 408"
        );
    }

    let providers = orchestrator.registry().names();
    info!(
        version = munez::PKG_VERSION,
        %addr,
        providers = ?providers,
        "munezd starting"
    );

    let app = build_app(
        AppState::new(orchestrator),
        config.server.request_timeout_secs,
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("munezd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    } else {
        // No signal handler available; never resolve.
        std::future::pending::<()>().await;
    }
}

fn print_providers(config: &Config, credentials: &Credentials) {
    let active = ProviderRegistry::active_configs(&config.providers, credentials);

    for kind in ProviderKind::ALL {
        match credentials.get(kind) {
            Some(key) => println!(
                "  {:<13} {}  ({})",
                kind.display_name(),
                mask_secret(key),
                kind.env_var()
            ),
            None => println!(
                "  {:<13} not configured  ({})",
                kind.display_name(),
                kind.env_var()
            ),
        }
    }

    println!();
    if active.is_empty() {
        println!("No API providers configured. Set at least one key above.");
        return;
    }

    println!("Fallback order:");
    for (i, provider) in active.iter().enumerate() {
        println!(
            "  {}. {} ({}, {})",
            i + 1,
            provider.name,
            provider.model,
            provider.endpoint
        );
    }
}
