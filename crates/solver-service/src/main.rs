use anyhow::{Context, Result};
use clap::Parser;
use solver_config::{load_config, ConfigLoader, SolverConfig};
use solver_core::SolverEngine;
use solver_service::{
	api::{self, AppState},
	cli::{render_plans, Args, Command},
	quotes::{spawn_sweeper, QuoteBook},
};
use solver_storage::StorageService;
use solver_types::Intent;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const QUOTE_SWEEP_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let config = match &args.config {
		Some(path) => ConfigLoader::new().with_file(path).load().await,
		None => load_config().await,
	}
	.context("Failed to load configuration")?;

	// RUST_LOG wins, then --log-level, then the configured level
	let log_level = args
		.log_level
		.clone()
		.unwrap_or_else(|| config.solver.log_level.clone());
	setup_tracing(&log_level)?;

	match args.command {
		Some(Command::Serve) | None => serve(config).await,
		Some(Command::Quote { intent, json }) => quote(config, &intent, json).await,
		Some(Command::Validate) => validate(config),
	}
}

async fn serve(config: SolverConfig) -> Result<()> {
	info!("Starting {}", config.solver.name);

	let engine = SolverEngine::from_config(&config).context("Failed to build solver engine")?;
	let quotes = Arc::new(QuoteBook::new(StorageService::in_memory()));
	let sweeper = spawn_sweeper(quotes.clone(), QUOTE_SWEEP_INTERVAL);
	let state = AppState {
		engine: Arc::new(engine),
		quotes,
	};

	let served =
		api::start_http_server(state, &config.api.host, config.api.port, shutdown_signal()).await;
	sweeper.abort();
	served.context("HTTP server failed")?;

	info!("{} stopped", config.solver.name);
	Ok(())
}

async fn quote(config: SolverConfig, path: &Path, json: bool) -> Result<()> {
	let content = tokio::fs::read_to_string(path)
		.await
		.with_context(|| format!("Failed to read intent file {}", path.display()))?;
	let intent: Intent = serde_json::from_str(&content)
		.with_context(|| format!("Failed to parse intent file {}", path.display()))?;

	let engine = SolverEngine::from_config(&config).context("Failed to build solver engine")?;
	let plans = engine.solve(&intent).context("Failed to solve intent")?;

	if json {
		println!("{}", serde_json::to_string_pretty(&plans)?);
	} else {
		print!("{}", render_plans(&plans));
	}
	Ok(())
}

fn validate(config: SolverConfig) -> Result<()> {
	let engine = SolverEngine::from_config(&config).context("Invalid strategy configuration")?;

	info!("Configuration is valid");
	info!("Solver name: {}", config.solver.name);
	info!("API: {}:{}", config.api.host, config.api.port);
	info!("Strategies: {}", engine.strategy_names().join(", "));
	info!(
		"Market: {} tokens, {} chains, {} bridges",
		config.market.prices.len(),
		config.market.chains.len(),
		config.market.bridges.len()
	);
	Ok(())
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
		.context("Invalid log level")?;

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = signal::ctrl_c().await {
			tracing::error!("Failed to listen for Ctrl+C: {}", e);
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			}
			Err(e) => {
				tracing::error!("Failed to install SIGTERM handler: {}", e);
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	info!("Shutdown signal received");
}
