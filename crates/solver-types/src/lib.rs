//! Shared types for the intent solver.
//!
//! This crate defines the data model exchanged between the solver crates and
//! the presentation layer: the user's [`Intent`], the [`Leg`]s and [`Plan`]s
//! produced by route strategies, the static [`MarketData`] tables every
//! computation reads from, and the configuration-schema helpers used to
//! validate strategy options.

pub mod intent;
pub mod market;
pub mod plan;
pub mod validation;

pub use intent::*;
pub use market::*;
pub use plan::*;
pub use validation::*;
