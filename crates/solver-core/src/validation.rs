//! Fail-fast intent validation.
//!
//! Runs before any pricing; intents that would price to NaN or negative
//! amounts never reach the strategies.

use solver_types::{Chain, Intent, MarketData, Token};
use thiserror::Error;

/// Upper bound for the slippage tolerance (100%).
pub const MAX_SLIPPAGE_BPS: u32 = 10_000;

/// Reasons an intent is rejected before solving.
#[derive(Debug, Error, PartialEq)]
pub enum IntentError {
	#[error("amount must be positive and finite, got {0}")]
	InvalidAmount(f64),
	#[error("unknown {field} chain: {chain}")]
	UnknownChain { field: &'static str, chain: Chain },
	#[error("unknown {field} token: {token}")]
	UnknownToken { field: &'static str, token: Token },
	#[error("{amount} {token} is too large to price")]
	ValueOverflow { amount: f64, token: Token },
	#[error("max slippage of {0} bps exceeds 10000 bps")]
	SlippageOutOfRange(u32),
	#[error("deadline must be at least one second")]
	ZeroDeadline,
	#[error("{0} must not be empty")]
	MissingParty(&'static str),
	#[error("source and destination are identical, nothing to route")]
	NoOpTransfer,
}

/// Checks `intent` against the market tables.
pub fn validate_intent(intent: &Intent, market: &MarketData) -> Result<(), IntentError> {
	if intent.sender.trim().is_empty() {
		return Err(IntentError::MissingParty("sender"));
	}
	if intent.receiver.trim().is_empty() {
		return Err(IntentError::MissingParty("receiver"));
	}

	if !intent.amount.is_finite() || intent.amount <= 0.0 {
		return Err(IntentError::InvalidAmount(intent.amount));
	}

	for (field, chain) in [("source", &intent.src_chain), ("destination", &intent.dst_chain)] {
		if market.chain(chain).is_none() {
			return Err(IntentError::UnknownChain {
				field,
				chain: chain.clone(),
			});
		}
	}

	for (field, token) in [
		("source", &intent.src_token),
		("destination", &intent.dst_token),
		("fee", &intent.prefer_fee_token),
	] {
		if market.price(token).is_none() {
			return Err(IntentError::UnknownToken {
				field,
				token: token.clone(),
			});
		}
	}

	// Pricing multiplies the amount by the source price before any fee.
	let value = market.price(&intent.src_token).map(|price| intent.amount * price);
	if value.is_some_and(|v| !v.is_finite()) {
		return Err(IntentError::ValueOverflow {
			amount: intent.amount,
			token: intent.src_token.clone(),
		});
	}

	if intent.max_slippage_bps > MAX_SLIPPAGE_BPS {
		return Err(IntentError::SlippageOutOfRange(intent.max_slippage_bps));
	}

	if intent.deadline_sec == 0 {
		return Err(IntentError::ZeroDeadline);
	}

	if !intent.is_cross_chain() && !intent.needs_swap() {
		return Err(IntentError::NoOpTransfer);
	}

	Ok(())
}
