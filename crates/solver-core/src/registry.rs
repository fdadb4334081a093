//! Strategy registry for building the configured route strategies.

use solver_strategies::{implementations, RouteStrategy};
use solver_types::ConfigSchema;
use std::collections::BTreeMap;
use tracing::info;

use crate::CoreError;

/// Builds a strategy from its options table.
pub type StrategyFactory = fn(&toml::Value) -> Box<dyn RouteStrategy>;

/// Registry of known strategies.
///
/// Registration order is evaluation order, which is also the tie-break order
/// when plans score equally.
pub struct StrategyRegistry {
	entries: Vec<(String, StrategyFactory)>,
}

impl StrategyRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			entries: Vec::new(),
		}
	}

	/// Registers a strategy factory under `id`.
	pub fn register(
		&mut self,
		id: impl Into<String>,
		factory: StrategyFactory,
	) -> Result<(), CoreError> {
		let id = id.into();
		if self.entries.iter().any(|(existing, _)| existing == &id) {
			return Err(CoreError::Configuration(format!(
				"Strategy {} already registered",
				id
			)));
		}

		self.entries.push((id, factory));
		Ok(())
	}

	/// Registered ids in evaluation order.
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(id, _)| id.as_str())
	}

	/// Builds every enabled strategy in evaluation order.
	///
	/// Strategies without an options table are built with defaults. Option
	/// tables for unregistered ids are rejected.
	pub fn build(
		&self,
		options: &BTreeMap<String, toml::Value>,
	) -> Result<Vec<Box<dyn RouteStrategy>>, CoreError> {
		if let Some(unknown) = options
			.keys()
			.find(|key| !self.entries.iter().any(|(id, _)| id == *key))
		{
			return Err(CoreError::Configuration(format!(
				"Unknown strategy: {}",
				unknown
			)));
		}

		let empty = toml::Value::Table(toml::Table::new());
		let mut strategies = Vec::with_capacity(self.entries.len());

		for (id, factory) in &self.entries {
			let config = options.get(id).unwrap_or(&empty);
			let strategy = factory(config);

			strategy.config_schema().validate(config).map_err(|e| {
				CoreError::Configuration(format!("Strategy {}: {}", id, e))
			})?;

			let enabled = config
				.get("enabled")
				.and_then(|v| v.as_bool())
				.unwrap_or(true);
			if !enabled {
				info!("Strategy {} disabled by configuration", id);
				continue;
			}

			strategies.push(strategy);
		}

		Ok(strategies)
	}
}

impl Default for StrategyRegistry {
	/// Registry with the built-in strategies: swap-then-bridge, then
	/// bridge-then-swap.
	fn default() -> Self {
		Self {
			entries: vec![
				(
					"swap_then_bridge".to_string(),
					implementations::swap_then_bridge::create_strategy as StrategyFactory,
				),
				(
					"bridge_then_swap".to_string(),
					implementations::bridge_then_swap::create_strategy as StrategyFactory,
				),
			],
		}
	}
}
