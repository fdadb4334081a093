//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use solver_types::{format_amount, Plan};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "intent-solver")]
#[command(about = "Cross-chain intent route solver", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file (TOML, JSON or YAML)
	#[arg(short, long, env = "CONFIG_FILE")]
	pub config: Option<PathBuf>,

	/// Log level override (trace, debug, info, warn, error)
	#[arg(short, long)]
	pub log_level: Option<String>,

	/// Subcommand to execute, defaults to `serve`
	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
	/// Solve an intent read from a JSON file and print the ranked plans
	Quote {
		/// Intent file
		#[arg(short, long)]
		intent: PathBuf,

		/// Print plans as JSON instead of a summary
		#[arg(long)]
		json: bool,
	},

	/// Run the HTTP API
	Serve,

	/// Validate the configuration and exit
	Validate,
}

/// Renders ranked plans as a human-readable summary.
pub fn render_plans(plans: &[Plan]) -> String {
	if plans.is_empty() {
		return "No route found for this intent.\n".to_string();
	}

	let mut out = String::new();
	for (rank, plan) in plans.iter().enumerate() {
		let _ = writeln!(
			out,
			"#{} {}  score {:.2}",
			rank + 1,
			plan.solver,
			plan.score
		);
		let _ = writeln!(
			out,
			"   out {}  rate {:.6}  fees {}  eta {}s  privacy {}  gas {}  {}",
			format_amount(plan.total_out),
			plan.effective_rate,
			plan.fee_grade,
			plan.eta_sec,
			if plan.privacy_supported { "yes" } else { "no" },
			plan.gas_token,
			if plan.atomic { "atomic" } else { "non-atomic" },
		);
		for leg in &plan.legs {
			let _ = writeln!(out, "   - {}", leg);
		}
	}
	out
}
