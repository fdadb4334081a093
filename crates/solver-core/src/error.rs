// solver-core/src/error.rs

use thiserror::Error;

use crate::validation::IntentError;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
	#[error("Invalid intent: {0}")]
	InvalidIntent(#[from] IntentError),

	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error("Settlement error: {0}")]
	Settlement(String),
}
