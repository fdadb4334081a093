//! Plan scoring and ranking.

use solver_strategies::pricing::SIMULATED_SLIPPAGE_BPS;
use solver_types::{FeeGrade, Intent, Plan};
use std::cmp::Ordering;

/// Points per unit of effective rate.
pub const RATE_WEIGHT: f64 = 1000.0;
pub const HIGH_FEE_PENALTY: f64 = 20.0;
pub const PRIVACY_BONUS: f64 = 15.0;
/// ETA below which no latency penalty applies.
pub const LATENCY_GRACE_SECS: f64 = 45.0;
/// Seconds of ETA above the grace period per penalty point.
pub const LATENCY_SECS_PER_POINT: f64 = 5.0;
/// Applied to every plan when the user tolerates less slippage than swaps assume.
pub const TIGHT_SLIPPAGE_PENALTY: f64 = 5.0;

/// Scores a single plan against the intent it was built for.
pub fn score(plan: &Plan, intent: &Intent) -> f64 {
	let rate_score = plan.effective_rate * RATE_WEIGHT;

	let fee_penalty = match plan.fee_grade {
		FeeGrade::High => HIGH_FEE_PENALTY,
		FeeGrade::Low => 0.0,
	};

	let privacy_bonus = if intent.privacy && plan.privacy_supported {
		PRIVACY_BONUS
	} else {
		0.0
	};

	let latency_penalty =
		((plan.eta_sec as f64 - LATENCY_GRACE_SECS) / LATENCY_SECS_PER_POINT).max(0.0);

	rate_score + privacy_bonus - latency_penalty - fee_penalty
}

/// Adjustment applied once to every plan of a solve call.
pub fn slippage_adjustment(intent: &Intent) -> f64 {
	if intent.max_slippage_bps < SIMULATED_SLIPPAGE_BPS {
		-TIGHT_SLIPPAGE_PENALTY
	} else {
		0.0
	}
}

/// Sorts plans by descending score. Equal scores keep their input order.
pub fn rank(mut plans: Vec<Plan>) -> Vec<Plan> {
	plans.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
	plans
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::intent;

	fn plan(solver: &str, effective_rate: f64, fee_grade: FeeGrade, eta_sec: u64) -> Plan {
		Plan {
			solver: solver.to_string(),
			legs: Vec::new(),
			total_in: 100.0,
			total_out: 100.0 * effective_rate,
			effective_rate,
			fee_grade,
			eta_sec,
			privacy_supported: true,
			gas_token: "USDC".into(),
			atomic: true,
			score: 0.0,
		}
	}

	#[test]
	fn test_score_components() {
		let intent = intent();

		// 990 + 15 privacy, no latency penalty under 45s
		let fast = plan("A", 0.99, FeeGrade::Low, 40);
		assert!((score(&fast, &intent) - 1005.0).abs() < 1e-9);

		// 990 + 15 - (70 - 45) / 5 - 20
		let slow = plan("B", 0.99, FeeGrade::High, 70);
		assert!((score(&slow, &intent) - 980.0).abs() < 1e-9);
	}

	#[test]
	fn test_privacy_bonus_requires_both_sides() {
		let mut intent = intent();
		let mut p = plan("A", 1.0, FeeGrade::Low, 45);
		assert_eq!(score(&p, &intent), 1015.0);

		p.privacy_supported = false;
		assert_eq!(score(&p, &intent), 1000.0);

		p.privacy_supported = true;
		intent.privacy = false;
		assert_eq!(score(&p, &intent), 1000.0);
	}

	#[test]
	fn test_slippage_adjustment() {
		let mut intent = intent();
		intent.max_slippage_bps = 20;
		assert_eq!(slippage_adjustment(&intent), 0.0);
		intent.max_slippage_bps = 19;
		assert_eq!(slippage_adjustment(&intent), -5.0);
	}

	#[test]
	fn test_rank_descending() {
		let mut low = plan("low", 0.9, FeeGrade::Low, 40);
		low.score = 900.0;
		let mut high = plan("high", 0.99, FeeGrade::Low, 40);
		high.score = 990.0;

		let ranked = rank(vec![low, high]);
		assert_eq!(ranked[0].solver, "high");
		assert_eq!(ranked[1].solver, "low");
	}

	#[test]
	fn test_rank_is_stable_for_equal_scores() {
		let mut a = plan("A", 0.99, FeeGrade::Low, 40);
		let mut b = plan("B", 0.99, FeeGrade::Low, 40);
		a.score = 1005.0;
		b.score = 1005.0;

		let ranked = rank(vec![a.clone(), b.clone()]);
		assert_eq!(ranked[0].solver, "A");
		assert_eq!(ranked[1].solver, "B");

		let ranked = rank(vec![b, a]);
		assert_eq!(ranked[0].solver, "B");
		assert_eq!(ranked[1].solver, "A");
	}
}
