//! Bridge the source token first, then swap on the destination chain.

use solver_types::{ConfigSchema, Field, FieldType, Intent, MarketData, Plan, Schema};
use tracing::debug;

use crate::pricing::{best_bridge, best_swap_on_chain};
use crate::{assemble_plan, route_eta, RouteStrategy};

pub const SOLVER_NAME: &str = "TeleportX v2";

/// Seconds subtracted from the route ETA for this topology.
pub const DEFAULT_ETA_BONUS_SECS: u64 = 4;

/// Moves the source token across chains, then converts it on arrival.
///
/// Unlike [`SwapThenBridge`](super::swap_then_bridge::SwapThenBridge), a
/// missing bridge does not abandon the route by default: the bridge leg is
/// skipped and the swap still runs on the destination chain. Setting
/// `require_bridge` makes a missing bridge abandon the route instead.
#[derive(Debug)]
pub struct BridgeThenSwap {
	require_bridge: bool,
	eta_bonus_secs: u64,
}

impl Default for BridgeThenSwap {
	fn default() -> Self {
		Self::new(false, DEFAULT_ETA_BONUS_SECS)
	}
}

impl BridgeThenSwap {
	pub fn new(require_bridge: bool, eta_bonus_secs: u64) -> Self {
		Self {
			require_bridge,
			eta_bonus_secs,
		}
	}
}

/// Configuration schema for BridgeThenSwap.
pub struct BridgeThenSwapSchema;

impl ConfigSchema for BridgeThenSwapSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), solver_types::ValidationError> {
		let schema = Schema::new(
			// Required fields
			vec![],
			// Optional fields
			vec![
				Field::new("enabled", FieldType::Boolean),
				Field::new("require_bridge", FieldType::Boolean),
				Field::new(
					"eta_bonus_secs",
					FieldType::Integer {
						min: Some(0),
						max: Some(60),
					},
				),
			],
		);

		schema.validate(config)
	}
}

impl RouteStrategy for BridgeThenSwap {
	fn name(&self) -> &str {
		SOLVER_NAME
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(BridgeThenSwapSchema)
	}

	fn build(&self, intent: &Intent, market: &MarketData) -> Option<Plan> {
		let mut legs = Vec::new();
		let mut amount = intent.amount;

		if intent.is_cross_chain() {
			match best_bridge(
				market,
				&intent.src_chain,
				&intent.dst_chain,
				amount,
				&intent.src_token,
			) {
				Some(bridge) => {
					amount = bridge.est_out;
					legs.push(bridge);
				}
				None if self.require_bridge => {
					debug!(
						strategy = SOLVER_NAME,
						from = %intent.src_chain,
						to = %intent.dst_chain,
						"no bridge route, abandoning plan"
					);
					return None;
				}
				None => {
					debug!(
						strategy = SOLVER_NAME,
						from = %intent.src_chain,
						to = %intent.dst_chain,
						"no bridge route, continuing without bridge leg"
					);
				}
			}
		}

		if intent.needs_swap() {
			let Some(swap) = best_swap_on_chain(
				market,
				&intent.dst_chain,
				amount,
				&intent.src_token,
				&intent.dst_token,
			) else {
				debug!(strategy = SOLVER_NAME, chain = %intent.dst_chain, "no AMM on destination chain");
				return None;
			};
			amount = swap.est_out;
			legs.push(swap);
		}

		if legs.is_empty() {
			return None;
		}

		let eta = route_eta(intent, market).saturating_sub(self.eta_bonus_secs);
		let privacy_supported = market
			.chain(&intent.dst_chain)
			.map(|c| c.private_settlement)
			.unwrap_or(false);

		Some(assemble_plan(
			SOLVER_NAME,
			legs,
			amount,
			intent,
			market,
			eta,
			privacy_supported,
		))
	}
}

/// Factory function to create the strategy from configuration.
///
/// Configuration parameters:
/// - `require_bridge`: abandon the route when no bridge exists (default: false)
/// - `eta_bonus_secs`: seconds subtracted from the ETA (default: 4)
pub fn create_strategy(config: &toml::Value) -> Box<dyn RouteStrategy> {
	let require_bridge = config
		.get("require_bridge")
		.and_then(|v| v.as_bool())
		.unwrap_or(false);

	let eta_bonus_secs = config
		.get("eta_bonus_secs")
		.and_then(|v| v.as_integer())
		.map(|v| v.max(0) as u64)
		.unwrap_or(DEFAULT_ETA_BONUS_SECS);

	Box::new(BridgeThenSwap::new(require_bridge, eta_bonus_secs))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::intent;
	use solver_types::{Chain, Token};

	#[test]
	fn test_bridge_then_swap_default_intent() {
		let market = MarketData::reference();
		let plan = BridgeThenSwap::default().build(&intent(), &market).unwrap();

		assert_eq!(plan.solver, "TeleportX v2");
		assert_eq!(plan.legs.len(), 2);
		assert!(plan.is_chain_consistent());

		let bridge = &plan.legs[0];
		assert!(bridge.is_bridge());
		assert_eq!(bridge.output_token(), &Token::new("USDC"));
		assert_eq!(bridge.est_in, 100.0);

		let swap = &plan.legs[1];
		assert_eq!(swap.chain, Chain::new("Base"));
		assert_eq!(swap.provider, "UniV3@Base");
		assert_eq!(swap.est_in, bridge.est_out);

		assert_eq!(plan.eta_sec, 66);
		// Base offers private settlement
		assert!(plan.privacy_supported);
	}

	#[test]
	fn test_no_privacy_when_landing_on_ethereum() {
		let market = MarketData::reference();
		let mut intent = intent();
		intent.src_chain = "Base".into();
		intent.dst_chain = "Ethereum".into();

		let plan = BridgeThenSwap::default().build(&intent, &market).unwrap();
		assert!(!plan.privacy_supported);
	}

	#[test]
	fn test_missing_bridge_keeps_destination_swap() {
		let mut market = MarketData::reference();
		market.bridges.clear();

		let plan = BridgeThenSwap::default().build(&intent(), &market).unwrap();
		assert_eq!(plan.legs.len(), 1);
		assert!(plan.legs[0].is_swap());
		assert_eq!(plan.legs[0].chain, Chain::new("Base"));
		assert_eq!(plan.legs[0].est_in, 100.0);
	}

	#[test]
	fn test_missing_bridge_same_token_yields_nothing() {
		let mut market = MarketData::reference();
		market.bridges.clear();
		let mut intent = intent();
		intent.dst_token = intent.src_token.clone();

		assert!(BridgeThenSwap::default().build(&intent, &market).is_none());
	}

	#[test]
	fn test_require_bridge_abandons_route() {
		let mut market = MarketData::reference();
		market.bridges.clear();
		let strategy = BridgeThenSwap::new(true, DEFAULT_ETA_BONUS_SECS);
		assert!(strategy.build(&intent(), &market).is_none());
	}

	#[test]
	fn test_factory_reads_options() {
		let config = toml::Value::Table(
			toml::from_str("require_bridge = true\neta_bonus_secs = 10").unwrap(),
		);
		assert!(BridgeThenSwapSchema.validate(&config).is_ok());

		let market = MarketData::reference();
		let plan = create_strategy(&config).build(&intent(), &market).unwrap();
		assert_eq!(plan.eta_sec, 60);
	}
}
