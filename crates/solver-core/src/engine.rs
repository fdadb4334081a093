// solver-core/src/engine.rs

use solver_config::SolverConfig;
use solver_strategies::RouteStrategy;
use solver_types::{Intent, MarketData, Plan};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
	error::CoreError,
	registry::StrategyRegistry,
	scoring::{rank, score, slippage_adjustment},
	validation::validate_intent,
};

/// Turns intents into ranked plans.
///
/// The engine holds the market tables and the strategies in evaluation
/// order. Solving is synchronous and has no side effects, so one engine can
/// be shared across tasks behind an `Arc`.
pub struct SolverEngine {
	market: Arc<MarketData>,
	strategies: Vec<Box<dyn RouteStrategy>>,
}

impl SolverEngine {
	pub fn new(market: Arc<MarketData>, strategies: Vec<Box<dyn RouteStrategy>>) -> Self {
		Self { market, strategies }
	}

	/// Engine with every built-in strategy at its defaults.
	pub fn with_default_strategies(market: Arc<MarketData>) -> Result<Self, CoreError> {
		Self::from_registry(market, &StrategyRegistry::default(), &Default::default())
	}

	/// Builds the engine from loaded configuration.
	pub fn from_config(config: &SolverConfig) -> Result<Self, CoreError> {
		config
			.market
			.check()
			.map_err(|e| CoreError::Configuration(e.to_string()))?;

		Self::from_registry(
			Arc::new(config.market.clone()),
			&StrategyRegistry::default(),
			&config.strategies,
		)
	}

	fn from_registry(
		market: Arc<MarketData>,
		registry: &StrategyRegistry,
		options: &std::collections::BTreeMap<String, toml::Value>,
	) -> Result<Self, CoreError> {
		let strategies = registry.build(options)?;
		if strategies.is_empty() {
			return Err(CoreError::Configuration(
				"at least one strategy must be enabled".to_string(),
			));
		}

		info!(
			strategies = ?strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
			"Solver engine ready"
		);
		Ok(Self::new(market, strategies))
	}

	pub fn market(&self) -> &MarketData {
		&self.market
	}

	/// Solver names in evaluation order.
	pub fn strategy_names(&self) -> Vec<&str> {
		self.strategies.iter().map(|s| s.name()).collect()
	}

	/// Produces the ranked plans for `intent`.
	///
	/// An intent no strategy can route yields an empty list, not an error.
	pub fn solve(&self, intent: &Intent) -> Result<Vec<Plan>, CoreError> {
		validate_intent(intent, &self.market)?;

		let adjustment = slippage_adjustment(intent);
		let mut plans = Vec::with_capacity(self.strategies.len());

		for strategy in &self.strategies {
			match strategy.build(intent, &self.market) {
				Some(mut plan) => {
					plan.score = score(&plan, intent) + adjustment;
					debug!(
						solver = %plan.solver,
						legs = plan.legs.len(),
						total_out = plan.total_out,
						eta_sec = plan.eta_sec,
						score = plan.score,
						"Strategy produced plan"
					);
					plans.push(plan);
				}
				None => debug!(solver = strategy.name(), "Strategy produced no plan"),
			}
		}

		let plans = rank(plans);
		info!(
			src = %intent.src_chain,
			dst = %intent.dst_chain,
			amount = intent.amount,
			plans = plans.len(),
			best = plans.first().map(|p| p.solver.as_str()).unwrap_or("none"),
			"Solved intent"
		);
		Ok(plans)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::intent;
	use crate::validation::IntentError;
	use solver_strategies::{BridgeThenSwap, SwapThenBridge};
	use solver_types::{AmmVenue, Chain, ChainParams, LegKind, Token};

	fn engine() -> SolverEngine {
		SolverEngine::with_default_strategies(Arc::new(MarketData::reference())).unwrap()
	}

	/// Reference tables plus a chain with latency and an AMM but no bridge.
	fn market_with_island() -> MarketData {
		let mut market = MarketData::reference();
		market.chains.insert(
			Chain::new("Solana"),
			ChainParams {
				latency_secs: 10,
				private_settlement: true,
			},
		);
		market.amms.insert(
			Chain::new("Solana"),
			vec![AmmVenue {
				name: "Orca".to_string(),
				fee_bps: 10,
			}],
		);
		market
	}

	#[test]
	fn test_default_intent_ranks_bridge_first() {
		let plans = engine().solve(&intent()).unwrap();
		assert_eq!(plans.len(), 2);

		assert_eq!(plans[0].solver, "TeleportX v2");
		assert_eq!(plans[1].solver, "RouteCraft v1");
		assert!(plans[0].score > plans[1].score);
		assert!((plans[0].score - 1007.7013).abs() < 1e-3);
		assert!((plans[1].score - 1006.9013).abs() < 1e-3);

		let route_craft = &plans[1];
		let first = &route_craft.legs[0];
		assert_eq!(first.chain, Chain::new("Ethereum"));
		assert_eq!(
			first.kind,
			LegKind::Swap {
				from_token: Token::new("USDC"),
				to_token: Token::new("USDT"),
			}
		);
		assert!(first.provider.ends_with("@Ethereum"));
		assert!(route_craft.total_out < 100.0);
		assert_eq!(route_craft.eta_sec, 70);

		for plan in &plans {
			assert!(plan.is_chain_consistent());
			assert!(plan.atomic);
			assert_eq!(plan.gas_token, Token::new("USDC"));
		}
	}

	#[test]
	fn test_solve_is_idempotent() {
		let engine = engine();
		let first = serde_json::to_vec(&engine.solve(&intent()).unwrap()).unwrap();
		let second = serde_json::to_vec(&engine.solve(&intent()).unwrap()).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn test_stablecoin_rates_below_one() {
		let engine = engine();
		let chains = ["Ethereum", "Base", "Arbitrum", "Polygon"];

		for src in chains {
			for dst in chains {
				let mut intent = intent();
				intent.src_chain = src.into();
				intent.dst_chain = dst.into();

				for plan in engine.solve(&intent).unwrap() {
					assert!(plan.effective_rate > 0.0, "{} {}->{}", plan.solver, src, dst);
					assert!(plan.effective_rate <= 1.0, "{} {}->{}", plan.solver, src, dst);
					assert!(plan.total_out <= intent.amount);
				}
			}
		}
	}

	#[test]
	fn test_tight_slippage_lowers_every_score() {
		let engine = engine();
		let loose = engine.solve(&intent()).unwrap();

		let mut tight_intent = intent();
		tight_intent.max_slippage_bps = 10;
		let tight = engine.solve(&tight_intent).unwrap();

		assert_eq!(loose.len(), tight.len());
		for (a, b) in loose.iter().zip(&tight) {
			assert_eq!(a.solver, b.solver);
			assert!((a.score - b.score - 5.0).abs() < 1e-9);
		}
	}

	#[test]
	fn test_unbridged_chain_same_token_yields_no_plans() {
		let engine =
			SolverEngine::with_default_strategies(Arc::new(market_with_island())).unwrap();

		let mut intent = intent();
		intent.dst_chain = "Solana".into();
		intent.dst_token = "USDC".into();

		assert_eq!(engine.solve(&intent).unwrap(), Vec::<Plan>::new());
	}

	#[test]
	fn test_unbridged_chain_keeps_destination_swap() {
		let engine =
			SolverEngine::with_default_strategies(Arc::new(market_with_island())).unwrap();

		let mut intent = intent();
		intent.dst_chain = "Solana".into();

		let plans = engine.solve(&intent).unwrap();
		assert_eq!(plans.len(), 1);
		assert_eq!(plans[0].solver, "TeleportX v2");
		assert_eq!(plans[0].legs.len(), 1);
		assert!(plans[0].legs[0].is_swap());
		assert_eq!(plans[0].legs[0].chain, Chain::new("Solana"));
	}

	#[test]
	fn test_unbridged_chain_rejected_by_both_when_bridge_required() {
		let engine = SolverEngine::new(
			Arc::new(market_with_island()),
			vec![
				Box::new(SwapThenBridge::new()),
				Box::new(BridgeThenSwap::new(true, 4)),
			],
		);

		let mut intent = intent();
		intent.dst_chain = "Solana".into();

		assert!(engine.solve(&intent).unwrap().is_empty());
	}

	#[test]
	fn test_rejects_overflowing_amount_before_pricing() {
		let mut intent = intent();
		intent.src_token = "ETH".into();
		intent.amount = 1e306;

		assert!(matches!(
			engine().solve(&intent),
			Err(CoreError::InvalidIntent(IntentError::ValueOverflow { .. }))
		));
	}

	#[test]
	fn test_rejects_no_op_intent() {
		let mut intent = intent();
		intent.dst_chain = intent.src_chain.clone();
		intent.dst_token = intent.src_token.clone();

		assert_eq!(
			engine().solve(&intent),
			Err(CoreError::InvalidIntent(IntentError::NoOpTransfer))
		);
	}

	#[test]
	fn test_from_config_respects_strategy_options() {
		let mut config = SolverConfig::default();
		config.strategies = toml::from_str("[swap_then_bridge]\nenabled = false").unwrap();

		let engine = SolverEngine::from_config(&config).unwrap();
		assert_eq!(engine.strategy_names(), ["TeleportX v2"]);

		let plans = engine.solve(&intent()).unwrap();
		assert_eq!(plans.len(), 1);
	}

	#[test]
	fn test_from_config_rejects_bad_setup() {
		let mut config = SolverConfig::default();
		config.strategies = toml::from_str("[fastest_route]\nenabled = true").unwrap();
		assert!(matches!(
			SolverEngine::from_config(&config),
			Err(CoreError::Configuration(_))
		));

		let mut config = SolverConfig::default();
		config.strategies = toml::from_str(
			"[swap_then_bridge]\nenabled = false\n[bridge_then_swap]\nenabled = false",
		)
		.unwrap();
		assert!(matches!(
			SolverEngine::from_config(&config),
			Err(CoreError::Configuration(_))
		));

		let mut config = SolverConfig::default();
		config.market.prices.insert(Token::new("USDC"), 0.0);
		assert!(matches!(
			SolverEngine::from_config(&config),
			Err(CoreError::Configuration(_))
		));
	}
}
