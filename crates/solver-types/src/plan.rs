//! Plan and leg types produced by route strategies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Chain, Token};

/// What a single leg does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LegKind {
	/// Token exchange on an AMM of the leg's chain.
	Swap {
		#[serde(rename = "fromToken")]
		from_token: Token,
		#[serde(rename = "toToken")]
		to_token: Token,
	},
	/// Same-asset transfer from the leg's chain to `to_chain`.
	Bridge {
		#[serde(rename = "bridgeToChain")]
		to_chain: Chain,
		asset: Token,
	},
}

/// One execution step of a plan.
///
/// The fee is denominated in the leg's input token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
	#[serde(flatten)]
	pub kind: LegKind,
	/// Chain the leg executes on.
	pub chain: Chain,
	pub est_in: f64,
	pub est_out: f64,
	pub fee: f64,
	pub provider: String,
}

impl Leg {
	pub fn is_swap(&self) -> bool {
		matches!(self.kind, LegKind::Swap { .. })
	}

	pub fn is_bridge(&self) -> bool {
		matches!(self.kind, LegKind::Bridge { .. })
	}

	/// Token consumed by a swap leg. Bridge legs carry no from-token.
	pub fn from_token(&self) -> Option<&Token> {
		match &self.kind {
			LegKind::Swap { from_token, .. } => Some(from_token),
			LegKind::Bridge { .. } => None,
		}
	}

	/// Token held after the leg completes.
	pub fn output_token(&self) -> &Token {
		match &self.kind {
			LegKind::Swap { to_token, .. } => to_token,
			LegKind::Bridge { asset, .. } => asset,
		}
	}

	/// Token held before the leg starts.
	pub fn input_token(&self) -> &Token {
		match &self.kind {
			LegKind::Swap { from_token, .. } => from_token,
			LegKind::Bridge { asset, .. } => asset,
		}
	}

	/// Chain the funds sit on after the leg completes.
	pub fn output_chain(&self) -> &Chain {
		match &self.kind {
			LegKind::Swap { .. } => &self.chain,
			LegKind::Bridge { to_chain, .. } => to_chain,
		}
	}
}

impl fmt::Display for Leg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.kind {
			LegKind::Swap {
				from_token,
				to_token,
			} => write!(
				f,
				"Swap on {}: {} {} -> {} {} (fee {} {})",
				self.provider,
				format_amount(self.est_in),
				from_token,
				format_amount(self.est_out),
				to_token,
				format_amount(self.fee),
				from_token
			),
			LegKind::Bridge { to_chain, asset } => write!(
				f,
				"Bridge via {}: {} {} ({} -> {}) -> {} {} (fee {} {})",
				self.provider,
				format_amount(self.est_in),
				asset,
				self.chain,
				to_chain,
				format_amount(self.est_out),
				asset,
				format_amount(self.fee),
				asset
			),
		}
	}
}

/// Coarse fee classification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeGrade {
	Low,
	High,
}

impl fmt::Display for FeeGrade {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FeeGrade::Low => f.write_str("low"),
			FeeGrade::High => f.write_str("high"),
		}
	}
}

/// A full candidate route proposed by one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
	/// Name of the solver/strategy that produced this plan.
	pub solver: String,
	/// Legs in execution order; the first leg consumes the intent amount.
	pub legs: Vec<Leg>,
	pub total_in: f64,
	pub total_out: f64,
	/// `total_out / total_in`.
	pub effective_rate: f64,
	#[serde(rename = "feesSummary")]
	pub fee_grade: FeeGrade,
	pub eta_sec: u64,
	pub privacy_supported: bool,
	pub gas_token: Token,
	pub atomic: bool,
	pub score: f64,
}

impl Plan {
	/// Checks that every leg picks up the funds where the previous one left them.
	pub fn is_chain_consistent(&self) -> bool {
		self.legs.windows(2).all(|pair| {
			pair[0].output_chain() == &pair[1].chain
				&& pair[0].output_token() == pair[1].input_token()
		})
	}
}

/// Formats an amount with at most six fractional digits, trimming zeros.
pub fn format_amount(value: f64) -> String {
	let formatted = format!("{:.6}", value);
	let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
	if trimmed.is_empty() || trimmed == "-" {
		"0".to_string()
	} else {
		trimmed.to_string()
	}
}
