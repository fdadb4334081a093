//! Configuration loading for the intent solver.
//!
//! Configuration is read from a TOML, JSON or YAML file (chosen by
//! extension), then environment overrides are applied and the result is
//! validated. The `[market]` section replaces the reference market tables
//! wholesale when present.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Toml,
	Json,
	Yaml,
}

impl ConfigFormat {
	fn from_path(path: &Path) -> Result<Self, ConfigError> {
		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Ok(Self::Toml),
			Some("json") => Ok(Self::Json),
			Some("yaml") | Some("yml") => Ok(Self::Yaml),
			_ => Err(ConfigError::ParseError(format!(
				"Unsupported config format: {}",
				path.display()
			))),
		}
	}
}

/// Configuration loader with environment variable overrides
pub struct ConfigLoader {
	file_path: Option<PathBuf>,
	env_prefix: String,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "SOLVER_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_path_buf());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	/// Loads, overrides and validates the configuration.
	///
	/// Without a file the defaults are used.
	pub async fn load(&self) -> Result<SolverConfig, ConfigError> {
		let mut config = match &self.file_path {
			Some(path) => self.load_from_file(path).await?,
			None => {
				debug!("No configuration file given, using defaults");
				SolverConfig::default()
			}
		};

		self.apply_env_overrides(&mut config)?;
		validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, path: &Path) -> Result<SolverConfig, ConfigError> {
		if !path.exists() {
			return Err(ConfigError::FileNotFound(path.display().to_string()));
		}
		info!("Loading configuration from {}", path.display());

		let format = ConfigFormat::from_path(path)?;
		let content = tokio::fs::read_to_string(path).await?;
		parse(&content, format)
	}

	fn apply_env_overrides(&self, config: &mut SolverConfig) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			debug!("Overriding log level from environment");
			config.solver.log_level = log_level;
		}

		if let Ok(host) = env::var(format!("{}HTTP_HOST", self.env_prefix)) {
			debug!("Overriding HTTP host from environment");
			config.api.host = host;
		}

		if let Ok(port) = env::var(format!("{}HTTP_PORT", self.env_prefix)) {
			config.api.port = port
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid HTTP port: {}", e)))?;
		}

		Ok(())
	}
}

/// Parses configuration content in the given format.
pub fn parse(content: &str, format: ConfigFormat) -> Result<SolverConfig, ConfigError> {
	match format {
		ConfigFormat::Toml => {
			toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
		}
		ConfigFormat::Json => {
			serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
		}
		ConfigFormat::Yaml => {
			serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
		}
	}
}

/// Checks cross-field constraints serde cannot express.
pub fn validate_config(config: &SolverConfig) -> Result<(), ConfigError> {
	if config.solver.name.trim().is_empty() {
		return Err(ConfigError::ValidationError(
			"Solver name must not be empty".to_string(),
		));
	}

	if config.api.port == 0 {
		return Err(ConfigError::ValidationError(
			"HTTP port must be non-zero".to_string(),
		));
	}

	for (name, options) in &config.strategies {
		if !options.is_table() {
			return Err(ConfigError::ValidationError(format!(
				"Options of strategy '{}' must be a table",
				name
			)));
		}
	}

	config
		.market
		.check()
		.map_err(|e| ConfigError::ValidationError(format!("Invalid market tables: {}", e)))?;

	Ok(())
}

/// Load configuration from standard locations
pub async fn load_config() -> Result<SolverConfig, ConfigError> {
	// Check for config file in order:
	// 1. Environment variable CONFIG_FILE
	// 2. ./config.toml
	// 3. ./config/solver.toml
	// 4. Defaults with env overrides

	if let Ok(path) = env::var("CONFIG_FILE") {
		return ConfigLoader::new().with_file(path).load().await;
	}

	for path in ["./config.toml", "./config/solver.toml"] {
		if Path::new(path).exists() {
			return ConfigLoader::new().with_file(path).load().await;
		}
	}

	ConfigLoader::new().load().await
}
