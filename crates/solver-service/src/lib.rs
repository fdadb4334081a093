//! Service layer for the intent solver.
//!
//! Hosts the HTTP API, the command-line interface and the quote book that
//! keeps issued plans until they are settled.
//!
//! # Components
//!
//! - `api`: axum routes for quoting and settling intents
//! - `cli`: command-line arguments and plan rendering
//! - `quotes`: quote issuance and single-use settlement

pub mod api;
pub mod cli;
pub mod quotes;
