//! In-memory storage backend.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

struct Entry {
	value: Vec<u8>,
	expires_at: Option<Instant>,
}

impl Entry {
	fn is_expired(&self, now: Instant) -> bool {
		self.expires_at.is_some_and(|at| now >= at)
	}
}

/// Concurrent map backend with optional per-entry expiry.
///
/// Expired entries are dropped lazily on access, or in bulk with
/// [`MemoryStorage::purge`].
#[derive(Default)]
pub struct MemoryStorage {
	entries: DashMap<String, Entry>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Drops every expired entry and returns how many were removed.
	pub fn purge(&self) -> usize {
		let now = Instant::now();
		let before = self.entries.len();
		self.entries.retain(|_, entry| !entry.is_expired(now));
		let purged = before.saturating_sub(self.entries.len());
		if purged > 0 {
			debug!(purged, "Purged expired entries");
		}
		purged
	}

	/// Number of live entries.
	pub fn len(&self) -> usize {
		let now = Instant::now();
		self.entries.iter().filter(|e| !e.is_expired(now)).count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let now = Instant::now();
		if let Some(entry) = self.entries.get(key) {
			if !entry.is_expired(now) {
				return Ok(entry.value.clone());
			}
		}

		self.entries.remove_if(key, |_, entry| entry.is_expired(now));
		Err(StorageError::NotFound)
	}

	async fn set_bytes(
		&self,
		key: &str,
		value: Vec<u8>,
		ttl: Option<Duration>,
	) -> Result<(), StorageError> {
		let expires_at = match ttl {
			Some(ttl) => Some(Instant::now().checked_add(ttl).ok_or_else(|| {
				StorageError::Backend(format!("TTL of {:?} is out of range", ttl))
			})?),
			None => None,
		};

		self.entries
			.insert(key.to_string(), Entry { value, expires_at });
		Ok(())
	}

	async fn take_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		match self.entries.remove(key) {
			Some((_, entry)) if !entry.is_expired(Instant::now()) => Ok(entry.value),
			_ => Err(StorageError::NotFound),
		}
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		self.entries.remove(key);
		Ok(())
	}

	async fn purge_expired(&self) -> Result<usize, StorageError> {
		Ok(self.purge())
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		Ok(self
			.entries
			.get(key)
			.is_some_and(|entry| !entry.is_expired(Instant::now())))
	}
}
