use crate::cache::{DEFAULT_SHARD_COUNT, ReferenceCache};

/// Builder for configuring a ReferenceCache.
///
/// # Example
///
/// ```
/// use thing_cache::CacheBuilder;
///
/// let cache = CacheBuilder::new()
///     .shards(64)
///     .initial_capacity(10_000)
///     .enabled(false)
///     .build();
///
/// assert!(!cache.is_enabled());
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder {
	shard_count: usize,
	initial_capacity: usize,
	enabled: bool,
}

impl CacheBuilder {
	/// Create a builder with default settings: 16 shards, no preallocation, enabled.
	pub fn new() -> Self {
		Self {
			shard_count: DEFAULT_SHARD_COUNT,
			initial_capacity: 0,
			enabled: true,
		}
	}

	/// Set the number of shards.
	///
	/// More shards reduce contention between threads working on different names.
	/// Will be rounded up to the next power of 2; zero is treated as one and
	/// anything above 65536 is clamped.
	///
	/// Default: 16 shards
	pub fn shards(mut self, count: usize) -> Self {
		self.shard_count = count;
		self
	}

	/// Expected number of distinct names, spread evenly across shards up front.
	///
	/// This is a sizing hint, not a limit.
	pub fn initial_capacity(mut self, capacity: usize) -> Self {
		self.initial_capacity = capacity;
		self
	}

	/// Whether registrations take effect right after `build`.
	///
	/// Default: true
	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Build the cache with the configured settings.
	pub fn build(self) -> ReferenceCache {
		ReferenceCache::with_config(self.shard_count, self.initial_capacity, self.enabled)
	}
}

impl Default for CacheBuilder {
	fn default() -> Self {
		Self::new()
	}
}
