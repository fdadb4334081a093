//! Swap on the source chain, then bridge to the destination chain.

use solver_types::{ConfigSchema, Field, FieldType, Intent, MarketData, Plan, Schema};
use tracing::debug;

use crate::pricing::{best_bridge, best_swap_on_chain};
use crate::{assemble_plan, route_eta, RouteStrategy};

pub const SOLVER_NAME: &str = "RouteCraft v1";

/// Converts to the destination token first, then moves it across chains.
///
/// A missing bridge abandons the whole route even when the swap priced fine.
#[derive(Debug, Default)]
pub struct SwapThenBridge;

impl SwapThenBridge {
	pub fn new() -> Self {
		Self
	}
}

/// Configuration schema for SwapThenBridge.
pub struct SwapThenBridgeSchema;

impl ConfigSchema for SwapThenBridgeSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), solver_types::ValidationError> {
		let schema = Schema::new(vec![], vec![Field::new("enabled", FieldType::Boolean)]);
		schema.validate(config)
	}
}

impl RouteStrategy for SwapThenBridge {
	fn name(&self) -> &str {
		SOLVER_NAME
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(SwapThenBridgeSchema)
	}

	fn build(&self, intent: &Intent, market: &MarketData) -> Option<Plan> {
		let mut legs = Vec::new();
		let mut amount = intent.amount;

		if intent.needs_swap() {
			let Some(swap) = best_swap_on_chain(
				market,
				&intent.src_chain,
				amount,
				&intent.src_token,
				&intent.dst_token,
			) else {
				debug!(strategy = SOLVER_NAME, chain = %intent.src_chain, "no AMM on source chain");
				return None;
			};
			amount = swap.est_out;
			legs.push(swap);
		}

		if intent.is_cross_chain() {
			match best_bridge(
				market,
				&intent.src_chain,
				&intent.dst_chain,
				amount,
				&intent.dst_token,
			) {
				Some(bridge) => {
					amount = bridge.est_out;
					legs.push(bridge);
				}
				None => {
					debug!(
						strategy = SOLVER_NAME,
						from = %intent.src_chain,
						to = %intent.dst_chain,
						"no bridge route, abandoning plan"
					);
					return None;
				}
			}
		}

		if legs.is_empty() {
			return None;
		}

		Some(assemble_plan(
			SOLVER_NAME,
			legs,
			amount,
			intent,
			market,
			route_eta(intent, market),
			true,
		))
	}
}

/// Factory function to create the strategy from configuration.
///
/// The strategy has no tunables besides `enabled`, which the engine reads.
pub fn create_strategy(_config: &toml::Value) -> Box<dyn RouteStrategy> {
	Box::new(SwapThenBridge::new())
}
