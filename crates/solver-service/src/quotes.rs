//! Quote book: issued plans held until they are settled or expire.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use solver_core::{simulate_settlement, CoreError, SettlementReceipt, SolverEngine};
use solver_storage::{StorageError, StorageService};
use solver_types::{Intent, Plan};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

const QUOTES_NAMESPACE: &str = "quotes";

/// Upper bound on how long a quote stays valid, whatever the intent deadline.
pub const MAX_QUOTE_TTL_SECS: u64 = 86_400;

#[derive(Debug, Error)]
pub enum QuoteError {
	#[error(transparent)]
	Solver(#[from] CoreError),
	#[error("Quote {0} not found or expired")]
	NotFound(String),
	#[error("Plan index {index} out of range, quote has {count} plans")]
	PlanIndexOutOfRange { index: usize, count: usize },
	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

/// Ranked plans issued for an intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
	pub quote_id: String,
	pub valid_until: DateTime<Utc>,
	pub plans: Vec<Plan>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredQuote {
	intent: Intent,
	plans: Vec<Plan>,
}

/// Issues quotes and settles them at most once.
pub struct QuoteBook {
	storage: StorageService,
}

impl QuoteBook {
	pub fn new(storage: StorageService) -> Self {
		Self { storage }
	}

	/// Solves `intent` and stores the plans for `deadline_sec` seconds, capped
	/// at [`MAX_QUOTE_TTL_SECS`].
	pub async fn issue(
		&self,
		engine: &SolverEngine,
		intent: Intent,
		now: DateTime<Utc>,
	) -> Result<Quote, QuoteError> {
		let plans = engine.solve(&intent)?;

		let quote_id = Uuid::new_v4().to_string();
		let ttl_secs = intent.deadline_sec.min(MAX_QUOTE_TTL_SECS);
		let ttl = Duration::from_secs(ttl_secs);
		let valid_until = now + ChronoDuration::seconds(ttl_secs as i64);

		let stored = StoredQuote {
			intent,
			plans: plans.clone(),
		};
		self.storage
			.store_with_ttl(QUOTES_NAMESPACE, &quote_id, &stored, Some(ttl))
			.await?;

		debug!(quote_id = %quote_id, plans = plans.len(), "Issued quote");
		Ok(Quote {
			quote_id,
			valid_until,
			plans,
		})
	}

	/// Executes plan `plan_index` of a live quote and consumes the quote.
	///
	/// A failed settlement leaves the quote in place.
	pub async fn settle(
		&self,
		quote_id: &str,
		plan_index: usize,
		now: DateTime<Utc>,
	) -> Result<SettlementReceipt, QuoteError> {
		let stored: StoredQuote = self
			.storage
			.retrieve(QUOTES_NAMESPACE, quote_id)
			.await
			.map_err(|e| not_found(e, quote_id))?;

		let plan = stored
			.plans
			.get(plan_index)
			.ok_or(QuoteError::PlanIndexOutOfRange {
				index: plan_index,
				count: stored.plans.len(),
			})?;

		let receipt = simulate_settlement(&stored.intent, plan, now.timestamp().max(0) as u64)?;

		// Another settle may have consumed the quote since it was read.
		let _: StoredQuote = self
			.storage
			.take(QUOTES_NAMESPACE, quote_id)
			.await
			.map_err(|e| not_found(e, quote_id))?;

		info!(quote_id = %quote_id, solver = %receipt.solver, "Quote settled");
		Ok(receipt)
	}

	/// Drops quotes whose validity has lapsed and returns how many went.
	pub async fn purge_expired(&self) -> Result<usize, QuoteError> {
		Ok(self.storage.purge_expired().await?)
	}
}

/// Purges expired quotes from `book` every `every` until the task is aborted.
///
/// Lapsed quotes are unreachable but otherwise stay in storage until read.
pub fn spawn_sweeper(book: Arc<QuoteBook>, every: Duration) -> JoinHandle<()> {
	tokio::spawn(async move {
		let mut interval = tokio::time::interval(every);
		interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

		loop {
			interval.tick().await;
			match book.purge_expired().await {
				Ok(0) => {}
				Ok(purged) => debug!(purged, "Swept expired quotes"),
				Err(e) => warn!("Failed to sweep expired quotes: {}", e),
			}
		}
	})
}

fn not_found(err: StorageError, quote_id: &str) -> QuoteError {
	match err {
		StorageError::NotFound => QuoteError::NotFound(quote_id.to_string()),
		other => QuoteError::Storage(other),
	}
}
