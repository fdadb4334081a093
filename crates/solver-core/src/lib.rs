//! Core solving pipeline.
//!
//! Validates intents, runs the configured route strategies over the market
//! tables, scores and ranks the resulting plans, and simulates settlement of
//! the plan a user picks.

pub mod engine;
pub mod error;
pub mod registry;
pub mod scoring;
pub mod settlement;
pub mod validation;

pub use engine::SolverEngine;
pub use error::CoreError;
pub use registry::{StrategyFactory, StrategyRegistry};
pub use settlement::{simulate_settlement, SettlementReceipt};
pub use validation::{validate_intent, IntentError};
