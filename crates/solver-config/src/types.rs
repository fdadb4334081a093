//! Configuration types for the solver.

use serde::{Deserialize, Serialize};
use solver_types::MarketData;
use std::collections::BTreeMap;

/// Complete solver configuration.
///
/// Every section has defaults, so an empty file yields a solver running on
/// the reference market tables with both strategies enabled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SolverConfig {
	/// Solver identity and logging
	#[serde(default)]
	pub solver: SolverSettings,
	/// HTTP API settings
	#[serde(default)]
	pub api: ApiConfig,
	/// Per-strategy option tables, keyed by strategy id
	#[serde(default)]
	pub strategies: BTreeMap<String, toml::Value>,
	/// Static market tables
	#[serde(default)]
	pub market: MarketData,
}

/// Solver identity and logging.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SolverSettings {
	#[serde(default = "default_name")]
	pub name: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

impl Default for SolverSettings {
	fn default() -> Self {
		Self {
			name: default_name(),
			log_level: default_log_level(),
		}
	}
}

/// HTTP API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			host: default_host(),
			port: default_port(),
		}
	}
}

fn default_name() -> String {
	"intent-solver".to_string()
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_host() -> String {
	"127.0.0.1".to_string()
}

fn default_port() -> u16 {
	3000
}
