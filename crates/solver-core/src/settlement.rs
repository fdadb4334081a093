//! Simulated settlement of a chosen plan.

use serde::{Deserialize, Serialize};
use solver_types::{Chain, Intent, Leg, Plan, Token};
use tracing::info;

use crate::CoreError;

/// Outcome of executing a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
	pub solver: String,
	pub receiver: String,
	pub amount_out: f64,
	pub dst_chain: Chain,
	pub dst_token: Token,
	/// All legs execute or none do.
	pub atomic: bool,
	pub legs: Vec<Leg>,
	/// Unix timestamp in seconds.
	pub settled_at: u64,
}

/// Executes `plan` for `intent` and returns the receipt.
///
/// Nothing is sent anywhere; the receipt reports what the plan promised.
pub fn simulate_settlement(
	intent: &Intent,
	plan: &Plan,
	settled_at: u64,
) -> Result<SettlementReceipt, CoreError> {
	let Some(last) = plan.legs.last() else {
		return Err(CoreError::Settlement(format!(
			"plan from {} has no legs",
			plan.solver
		)));
	};

	if !plan.is_chain_consistent() {
		return Err(CoreError::Settlement(format!(
			"legs of {} do not connect",
			plan.solver
		)));
	}

	if last.output_chain() != &intent.dst_chain || last.output_token() != &intent.dst_token {
		return Err(CoreError::Settlement(format!(
			"plan from {} delivers {} on {}, intent wants {} on {}",
			plan.solver,
			last.output_token(),
			last.output_chain(),
			intent.dst_token,
			intent.dst_chain
		)));
	}

	info!(
		solver = %plan.solver,
		receiver = %intent.receiver,
		amount_out = plan.total_out,
		"Settled plan"
	);

	Ok(SettlementReceipt {
		solver: plan.solver.clone(),
		receiver: intent.receiver.clone(),
		amount_out: plan.total_out,
		dst_chain: intent.dst_chain.clone(),
		dst_token: intent.dst_token.clone(),
		atomic: plan.atomic,
		legs: plan.legs.clone(),
		settled_at,
	})
}
