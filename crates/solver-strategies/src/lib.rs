//! Route strategies for turning an intent into candidate plans.
//!
//! A strategy is a fixed route topology. Given an intent and the market
//! tables it chains leg-pricer calls into a [`Plan`], or yields nothing when
//! the topology cannot serve the intent (for example when no bridge connects
//! the required chains). Strategies never score plans; ranking happens in the
//! solver engine once every strategy has run.

use solver_types::{ConfigSchema, FeeGrade, Intent, Leg, MarketData, Plan};

pub mod pricing;

/// Re-export implementations
pub mod implementations {
	pub mod bridge_then_swap;
	pub mod swap_then_bridge;
}

pub use implementations::bridge_then_swap::BridgeThenSwap;
pub use implementations::swap_then_bridge::SwapThenBridge;

/// Fee-to-input ratio above which a plan is graded `high`.
pub const HIGH_FEE_RATIO: f64 = 0.004;

/// Trait implemented by every route topology.
///
/// Implementations must be deterministic: the same intent and tables always
/// produce the same plan.
pub trait RouteStrategy: Send + Sync {
	/// Solver name attached to the plans this strategy emits.
	fn name(&self) -> &str;

	/// Schema of the options table accepted by this strategy.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Builds the plan for `intent`, or `None` when the route is not viable.
	///
	/// The returned plan carries a zero score.
	fn build(&self, intent: &Intent, market: &MarketData) -> Option<Plan>;
}

/// Grades the fees of `legs` relative to the value of the intent.
///
/// Each fee is valued at the price of the leg's from-token; bridge legs have
/// none and are valued at the source token.
pub fn fee_grade(legs: &[Leg], intent: &Intent, market: &MarketData) -> FeeGrade {
	let src_price = market.price(&intent.src_token).unwrap_or(0.0);
	let fees: f64 = legs
		.iter()
		.map(|leg| {
			let price = leg
				.from_token()
				.and_then(|token| market.price(token))
				.unwrap_or(src_price);
			leg.fee * price
		})
		.sum();

	let input_value = intent.amount * src_price;
	if input_value > 0.0 && fees / input_value > HIGH_FEE_RATIO {
		FeeGrade::High
	} else {
		FeeGrade::Low
	}
}

/// Latency of the source chain plus the destination chain when it differs.
pub fn route_eta(intent: &Intent, market: &MarketData) -> u64 {
	let mut eta = market.latency(&intent.src_chain);
	if intent.is_cross_chain() {
		eta += market.latency(&intent.dst_chain);
	}
	eta
}

/// Aggregates resolved legs into an unscored plan.
pub fn assemble_plan(
	solver: &str,
	legs: Vec<Leg>,
	total_out: f64,
	intent: &Intent,
	market: &MarketData,
	eta_sec: u64,
	privacy_supported: bool,
) -> Plan {
	let total_in = intent.amount;
	let fee_grade = fee_grade(&legs, intent, market);

	Plan {
		solver: solver.to_string(),
		legs,
		total_in,
		total_out,
		effective_rate: total_out / total_in,
		fee_grade,
		eta_sec,
		privacy_supported,
		gas_token: intent.prefer_fee_token.clone(),
		atomic: true,
		score: 0.0,
	}
}

#[cfg(test)]
pub(crate) mod test_support {
	use solver_types::Intent;

	/// 100 USDC on Ethereum to USDT on Base, privacy requested.
	pub fn intent() -> Intent {
		Intent {
			sender: "@you".into(),
			receiver: "@alice".into(),
			amount: 100.0,
			src_chain: "Ethereum".into(),
			src_token: "USDC".into(),
			dst_chain: "Base".into(),
			dst_token: "USDT".into(),
			max_slippage_bps: 50,
			deadline_sec: 120,
			prefer_fee_token: "USDC".into(),
			privacy: true,
			notes: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use solver_types::LegKind;

	fn swap(fee: f64, from: &str) -> Leg {
		Leg {
			kind: LegKind::Swap {
				from_token: from.into(),
				to_token: "USDC".into(),
			},
			chain: "Ethereum".into(),
			est_in: 100.0,
			est_out: 99.0,
			fee,
			provider: "UniV3@Ethereum".into(),
		}
	}

	#[test]
	fn test_fee_grade_threshold() {
		let market = MarketData::reference();
		let intent = test_support::intent();

		// 0.3% of 100 USDC
		assert_eq!(fee_grade(&[swap(0.3, "USDC")], &intent, &market), FeeGrade::Low);
		// 0.5% of 100 USDC
		assert_eq!(fee_grade(&[swap(0.5, "USDC")], &intent, &market), FeeGrade::High);
	}

	#[test]
	fn test_fee_grade_values_fee_in_leg_token() {
		let market = MarketData::reference();
		let intent = test_support::intent();

		// 0.001 ETH is 3.2 USDC of fees on a 100 USDC transfer
		assert_eq!(fee_grade(&[swap(0.001, "ETH")], &intent, &market), FeeGrade::High);
	}

	#[test]
	fn test_fee_grade_values_bridge_fee_at_source_price() {
		let market = MarketData::reference();
		let mut intent = test_support::intent();
		intent.dst_token = "ETH".into();

		let plan = SwapThenBridge::new().build(&intent, &market).unwrap();
		let (swap_leg, bridge_leg) = (&plan.legs[0], &plan.legs[1]);
		assert!(bridge_leg.is_bridge());
		assert_eq!(bridge_leg.output_token(), &solver_types::Token::new("ETH"));

		// Bridge fee is in ETH but counted at the USDC price of 1
		let fees = swap_leg.fee + bridge_leg.fee;
		assert!(fees / intent.amount < HIGH_FEE_RATIO);
		assert_eq!(plan.fee_grade, FeeGrade::Low);

		// 0.35 USDC + 0.0001 ETH: 0.3501 at the source price, 0.67 at the ETH price
		let mut heavy_bridge = bridge_leg.clone();
		heavy_bridge.fee = 0.0001;
		assert_eq!(
			fee_grade(&[swap(0.35, "USDC"), heavy_bridge], &intent, &market),
			FeeGrade::Low
		);
	}

	#[test]
	fn test_route_eta() {
		let market = MarketData::reference();
		let mut intent = test_support::intent();
		assert_eq!(route_eta(&intent, &market), 70);

		intent.dst_chain = "Ethereum".into();
		assert_eq!(route_eta(&intent, &market), 50);
	}

	#[test]
	fn test_assemble_plan_rate() {
		let market = MarketData::reference();
		let intent = test_support::intent();
		let plan = assemble_plan("X", vec![swap(0.06, "USDC")], 99.74, &intent, &market, 70, true);
		assert!((plan.effective_rate - 0.9974).abs() < 1e-12);
		assert_eq!(plan.total_in, 100.0);
		assert_eq!(plan.gas_token, intent.prefer_fee_token);
		assert!(plan.atomic);
		assert_eq!(plan.score, 0.0);
	}
}
