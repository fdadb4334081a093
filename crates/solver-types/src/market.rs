//! Static market data tables.
//!
//! Every pricing and routing decision is a deterministic function of these
//! tables. They are built once (from [`MarketData::reference`] or from
//! configuration) and shared read-only with the solver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::{Chain, Token};

/// Errors found when checking the consistency of a market table.
#[derive(Debug, Error, PartialEq)]
pub enum MarketError {
	#[error("Price for {token} must be positive and finite, got {price}")]
	InvalidPrice { token: Token, price: f64 },
	#[error("{context} references unknown chain {chain}")]
	UnknownChain { context: String, chain: Chain },
	#[error("Fee of {venue} is {fee_bps} bps, above 10000")]
	FeeOutOfRange { venue: String, fee_bps: u32 },
	#[error("Bridge {0} must connect at least two chains")]
	DegenerateBridge(String),
}

/// Per-chain parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainParams {
	/// Estimated time for a step on this chain to finalize.
	pub latency_secs: u64,
	/// Whether shielded settlement is available on this chain.
	#[serde(default = "default_true")]
	pub private_settlement: bool,
}

/// A bridge and the chains it connects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeRoute {
	pub name: String,
	pub chains: Vec<Chain>,
	pub fee_bps: u32,
	pub latency_secs: u64,
}

impl BridgeRoute {
	/// Returns true when the bridge serves both chains.
	pub fn connects(&self, a: &Chain, b: &Chain) -> bool {
		self.chains.contains(a) && self.chains.contains(b)
	}
}

/// An automated market maker available on a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmmVenue {
	pub name: String,
	pub fee_bps: u32,
}

/// The complete set of static tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
	/// Mid price of each token in the reference unit.
	pub prices: BTreeMap<Token, f64>,
	pub chains: BTreeMap<Chain, ChainParams>,
	/// Bridges in evaluation order.
	pub bridges: Vec<BridgeRoute>,
	/// AMMs per chain, in evaluation order.
	pub amms: BTreeMap<Chain, Vec<AmmVenue>>,
}

impl Default for MarketData {
	fn default() -> Self {
		Self::reference()
	}
}

impl MarketData {
	/// Reference tables: four chains, three bridges and two AMMs per chain.
	pub fn reference() -> Self {
		let prices = [("ETH", 3200.0), ("USDC", 1.0), ("USDT", 1.0), ("DAI", 1.0)]
			.into_iter()
			.map(|(token, price)| (Token::new(token), price))
			.collect();

		let chains = [
			("Ethereum", 50, false),
			("Base", 20, true),
			("Arbitrum", 25, true),
			("Polygon", 15, true),
		]
		.into_iter()
		.map(|(chain, latency_secs, private_settlement)| {
			(
				Chain::new(chain),
				ChainParams {
					latency_secs,
					private_settlement,
				},
			)
		})
		.collect();

		let bridge = |name: &str, chains: &[&str], fee_bps, latency_secs| BridgeRoute {
			name: name.to_string(),
			chains: chains.iter().map(|c| Chain::new(*c)).collect(),
			fee_bps,
			latency_secs,
		};
		let bridges = vec![
			bridge("ConnextX", &["Ethereum", "Base", "Arbitrum", "Polygon"], 8, 30),
			bridge("HyperLoop", &["Ethereum", "Base"], 5, 18),
			bridge("ZKPort", &["Arbitrum", "Polygon", "Base"], 6, 16),
		];

		let venues = |list: &[(&str, u32)]| -> Vec<AmmVenue> {
			list.iter()
				.map(|(name, fee_bps)| AmmVenue {
					name: name.to_string(),
					fee_bps: *fee_bps,
				})
				.collect()
		};
		let amms = [
			("Ethereum", venues(&[("UniV3", 6), ("Sushi", 25)])),
			("Base", venues(&[("Aerodrome", 8), ("UniV3", 6)])),
			("Arbitrum", venues(&[("Camelot", 10), ("UniV3", 6)])),
			("Polygon", venues(&[("QuickSwap", 24), ("UniV3", 6)])),
		]
		.into_iter()
		.map(|(chain, list)| (Chain::new(chain), list))
		.collect();

		Self {
			prices,
			chains,
			bridges,
			amms,
		}
	}

	/// Mid price of `token` in the reference unit.
	pub fn price(&self, token: &Token) -> Option<f64> {
		self.prices.get(token).copied()
	}

	pub fn chain(&self, chain: &Chain) -> Option<&ChainParams> {
		self.chains.get(chain)
	}

	/// Latency of `chain`, zero for chains missing from the table.
	pub fn latency(&self, chain: &Chain) -> u64 {
		self.chain(chain).map(|c| c.latency_secs).unwrap_or(0)
	}

	/// AMMs registered for `chain`, in table order.
	pub fn amms_on(&self, chain: &Chain) -> &[AmmVenue] {
		self.amms.get(chain).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Bridges serving both chains, in table order.
	pub fn bridges_between<'a>(
		&'a self,
		a: &'a Chain,
		b: &'a Chain,
	) -> impl Iterator<Item = &'a BridgeRoute> + 'a {
		self.bridges.iter().filter(move |br| br.connects(a, b))
	}

	/// Checks the tables for internal consistency.
	pub fn check(&self) -> Result<(), MarketError> {
		for (token, price) in &self.prices {
			if !price.is_finite() || *price <= 0.0 {
				return Err(MarketError::InvalidPrice {
					token: token.clone(),
					price: *price,
				});
			}
		}

		for bridge in &self.bridges {
			if bridge.chains.len() < 2 {
				return Err(MarketError::DegenerateBridge(bridge.name.clone()));
			}
			if bridge.fee_bps > 10_000 {
				return Err(MarketError::FeeOutOfRange {
					venue: bridge.name.clone(),
					fee_bps: bridge.fee_bps,
				});
			}
			for chain in &bridge.chains {
				if !self.chains.contains_key(chain) {
					return Err(MarketError::UnknownChain {
						context: format!("Bridge {}", bridge.name),
						chain: chain.clone(),
					});
				}
			}
		}

		for (chain, venues) in &self.amms {
			if !self.chains.contains_key(chain) {
				return Err(MarketError::UnknownChain {
					context: "AMM table".to_string(),
					chain: chain.clone(),
				});
			}
			for venue in venues {
				if venue.fee_bps > 10_000 {
					return Err(MarketError::FeeOutOfRange {
						venue: format!("{}@{}", venue.name, chain),
						fee_bps: venue.fee_bps,
					});
				}
			}
		}

		Ok(())
	}
}

fn default_true() -> bool {
	true
}
