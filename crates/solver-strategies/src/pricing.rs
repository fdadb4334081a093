//! Leg pricing against the static market tables.
//!
//! Pure functions: the output of a swap or bridge hop is fully determined by
//! the input amount and the tables.

use solver_types::{Chain, Leg, LegKind, MarketData, Token};

/// Slippage assumed for every swap, in basis points.
pub const SIMULATED_SLIPPAGE_BPS: u32 = 20;

/// Converts basis points into a fraction.
pub fn bps(value: u32) -> f64 {
	value as f64 / 10_000.0
}

/// Result of pricing a single swap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapQuote {
	/// Amount received, in to-token units.
	pub out: f64,
	/// Venue fee, in from-token units.
	pub fee_in_from_token: f64,
}

/// Result of pricing a single bridge hop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BridgeQuote {
	pub out: f64,
	pub fee: f64,
}

/// Prices a swap of `amount` from one token to another through a venue
/// charging `fee_bps`.
///
/// Returns `None` when either token has no price.
pub fn price_swap(
	market: &MarketData,
	amount: f64,
	from: &Token,
	to: &Token,
	fee_bps: u32,
) -> Option<SwapQuote> {
	let price_from = market.price(from)?;
	let price_to = market.price(to)?;

	let reference = amount * price_from;
	let fee = reference * bps(fee_bps);
	let slippage = reference * bps(SIMULATED_SLIPPAGE_BPS);
	let remaining = (reference - fee - slippage).max(0.0);

	Some(SwapQuote {
		out: remaining / price_to,
		fee_in_from_token: fee / price_from,
	})
}

/// Prices a bridge hop. Bridges move the same asset, so there is no
/// conversion and no slippage.
pub fn price_bridge(amount: f64, fee_bps: u32) -> BridgeQuote {
	let fee = amount * bps(fee_bps);
	BridgeQuote {
		out: (amount - fee).max(0.0),
		fee,
	}
}

/// Picks the AMM on `chain` giving the largest output.
///
/// Ties keep the venue listed first. Returns `None` when the chain has no
/// AMM registered or a token has no price.
pub fn best_swap_on_chain(
	market: &MarketData,
	chain: &Chain,
	amount: f64,
	from: &Token,
	to: &Token,
) -> Option<Leg> {
	let mut best: Option<Leg> = None;

	for amm in market.amms_on(chain) {
		let quote = price_swap(market, amount, from, to, amm.fee_bps)?;
		let better = best.as_ref().map_or(true, |b| quote.out > b.est_out);
		if better {
			best = Some(Leg {
				kind: LegKind::Swap {
					from_token: from.clone(),
					to_token: to.clone(),
				},
				chain: chain.clone(),
				est_in: amount,
				est_out: quote.out,
				fee: quote.fee_in_from_token,
				provider: format!("{}@{}", amm.name, chain),
			});
		}
	}

	best
}

/// Picks the bridge between `a` and `b` giving the largest output.
///
/// `None` means the pair is unreachable, which is a normal outcome. Ties keep
/// the bridge listed first.
pub fn best_bridge(
	market: &MarketData,
	a: &Chain,
	b: &Chain,
	amount: f64,
	token: &Token,
) -> Option<Leg> {
	let mut best: Option<Leg> = None;

	for bridge in market.bridges_between(a, b) {
		let quote = price_bridge(amount, bridge.fee_bps);
		let better = best.as_ref().map_or(true, |l| quote.out > l.est_out);
		if better {
			best = Some(Leg {
				kind: LegKind::Bridge {
					to_chain: b.clone(),
					asset: token.clone(),
				},
				chain: a.clone(),
				est_in: amount,
				est_out: quote.out,
				fee: quote.fee,
				provider: bridge.name.clone(),
			});
		}
	}

	best
}

#[cfg(test)]
mod tests {
	use super::*;
	use solver_types::{AmmVenue, BridgeRoute};

	const EPS: f64 = 1e-9;

	#[test]
	fn test_price_swap_stable_pair() {
		let market = MarketData::reference();
		let quote = price_swap(&market, 100.0, &"USDC".into(), &"USDT".into(), 6).unwrap();
		// 6 bps fee + 20 bps slippage
		assert!((quote.out - 99.74).abs() < EPS);
		assert!((quote.fee_in_from_token - 0.06).abs() < EPS);
	}

	#[test]
	fn test_price_swap_converts_through_reference_unit() {
		let market = MarketData::reference();
		let quote = price_swap(&market, 1.0, &"ETH".into(), &"USDC".into(), 10).unwrap();
		assert!((quote.out - 3200.0 * (1.0 - 0.003)).abs() < 1e-6);
		assert!((quote.fee_in_from_token - 0.001).abs() < EPS);
	}

	#[test]
	fn test_price_swap_floors_at_zero() {
		let market = MarketData::reference();
		let quote = price_swap(&market, 10.0, &"DAI".into(), &"USDC".into(), 10_000).unwrap();
		assert_eq!(quote.out, 0.0);
		assert!((quote.fee_in_from_token - 10.0).abs() < EPS);
	}

	#[test]
	fn test_price_swap_unknown_token() {
		let market = MarketData::reference();
		assert!(price_swap(&market, 1.0, &"XYZ".into(), &"USDC".into(), 6).is_none());
	}

	#[test]
	fn test_price_bridge() {
		let quote = price_bridge(200.0, 5);
		assert!((quote.fee - 0.1).abs() < EPS);
		assert!((quote.out - 199.9).abs() < EPS);
	}

	#[test]
	fn test_best_swap_picks_cheapest_venue() {
		let market = MarketData::reference();
		let leg =
			best_swap_on_chain(&market, &"Base".into(), 50.0, &"USDC".into(), &"DAI".into())
				.unwrap();
		assert_eq!(leg.provider, "UniV3@Base");
		assert!(leg.is_swap());
		assert_eq!(leg.est_in, 50.0);
	}

	#[test]
	fn test_best_swap_tie_keeps_first_venue() {
		let mut market = MarketData::reference();
		market.amms.insert(
			"Base".into(),
			vec![
				AmmVenue {
					name: "First".into(),
					fee_bps: 6,
				},
				AmmVenue {
					name: "Second".into(),
					fee_bps: 6,
				},
			],
		);
		let leg =
			best_swap_on_chain(&market, &"Base".into(), 50.0, &"USDC".into(), &"DAI".into())
				.unwrap();
		assert_eq!(leg.provider, "First@Base");
	}

	#[test]
	fn test_best_swap_without_amms() {
		let mut market = MarketData::reference();
		market.amms.remove(&Chain::new("Polygon"));
		assert!(best_swap_on_chain(
			&market,
			&"Polygon".into(),
			1.0,
			&"USDC".into(),
			&"DAI".into()
		)
		.is_none());
	}

	#[test]
	fn test_best_bridge_picks_cheapest_route() {
		let market = MarketData::reference();
		let leg = best_bridge(&market, &"Ethereum".into(), &"Base".into(), 100.0, &"USDC".into())
			.unwrap();
		assert_eq!(leg.provider, "HyperLoop");
		assert_eq!(leg.output_chain(), &Chain::new("Base"));
		assert!((leg.est_out - 99.95).abs() < EPS);
	}

	#[test]
	fn test_best_bridge_tie_keeps_first_route() {
		let mut market = MarketData::reference();
		market.bridges = vec![
			BridgeRoute {
				name: "Alpha".into(),
				chains: vec!["Ethereum".into(), "Base".into()],
				fee_bps: 5,
				latency_secs: 10,
			},
			BridgeRoute {
				name: "Beta".into(),
				chains: vec!["Ethereum".into(), "Base".into()],
				fee_bps: 5,
				latency_secs: 5,
			},
		];
		let leg = best_bridge(&market, &"Ethereum".into(), &"Base".into(), 10.0, &"DAI".into())
			.unwrap();
		assert_eq!(leg.provider, "Alpha");
	}

	#[test]
	fn test_best_bridge_unreachable_pair() {
		let mut market = MarketData::reference();
		market.bridges.retain(|b| b.name == "ZKPort");
		assert!(
			best_bridge(&market, &"Ethereum".into(), &"Base".into(), 10.0, &"DAI".into())
				.is_none()
		);
	}
}
