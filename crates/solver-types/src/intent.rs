//! Intent types describing what the user wants to happen.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a chain as it appears in the market tables (e.g. "Ethereum").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain(pub String);

impl Chain {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Chain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Chain {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

/// Token symbol as it appears in the price table (e.g. "USDC").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(pub String);

impl Token {
	pub fn new(symbol: impl Into<String>) -> Self {
		Self(symbol.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Token {
	fn from(symbol: &str) -> Self {
		Self::new(symbol)
	}
}

/// A user's declared transfer outcome.
///
/// The intent states what should arrive where, under which constraints, and
/// leaves the execution path to the solver. It is never mutated by the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
	/// Opaque sender identifier.
	pub sender: String,
	/// Opaque receiver identifier.
	pub receiver: String,
	/// Amount to send, in source-token units.
	pub amount: f64,
	pub src_chain: Chain,
	pub src_token: Token,
	pub dst_chain: Chain,
	pub dst_token: Token,
	/// Maximum tolerated slippage in basis points.
	pub max_slippage_bps: u32,
	/// Settlement deadline in seconds.
	pub deadline_sec: u64,
	/// Token the user prefers to pay fees/gas in.
	pub prefer_fee_token: Token,
	/// Whether the user asks for shielded settlement.
	pub privacy: bool,
	/// Optional free-text note (invoice number, memo...).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}

impl Intent {
	/// Returns true when the transfer crosses chains.
	pub fn is_cross_chain(&self) -> bool {
		self.src_chain != self.dst_chain
	}

	/// Returns true when the destination token differs from the source token.
	pub fn needs_swap(&self) -> bool {
		self.src_token != self.dst_token
	}
}
