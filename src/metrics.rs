//! Cache usage metrics.

/// Snapshot of cache counters.
///
/// Counters are cumulative since the cache was built; `clear` does not reset them.
///
/// # Example
///
/// ```
/// use thing_cache::ReferenceCache;
///
/// let cache = ReferenceCache::new();
/// // ... register and look up things ...
///
/// let metrics = cache.metrics();
/// println!("Hit rate: {:.2}%", metrics.hit_rate() * 100.0);
/// println!("Reclaimed slots: {}", metrics.reclaimed);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
	/// Lookups that returned a live thing.
	pub hits: u64,
	/// Lookups that found no slot, a reclaimed slot, or a thing of another type.
	pub misses: u64,
	/// Registrations that created a new slot.
	pub registrations: u64,
	/// Registrations that replaced an existing slot for the same name.
	pub overwrites: u64,
	/// Registrations dropped because the cache was disabled.
	pub skipped: u64,
	/// Reclaimed slots removed by a lookup.
	pub reclaimed: u64,
	/// Slots removed through `forget`.
	pub removals: u64,
	/// Physical slots currently held, including reclaimed ones not yet observed.
	pub slot_count: usize,
}

impl CacheMetrics {
	/// Ratio of hits to total lookups, between 0.0 and 1.0.
	///
	/// Returns 0.0 if there have been no lookups.
	pub fn hit_rate(&self) -> f64 {
		let total = self.total_lookups();
		if total == 0 {
			0.0
		} else {
			self.hits as f64 / total as f64
		}
	}

	/// Total number of lookups (hits + misses).
	pub fn total_lookups(&self) -> u64 {
		self.hits + self.misses
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hit_rate_without_lookups() {
		let metrics = CacheMetrics::default();
		assert_eq!(metrics.hit_rate(), 0.0);
		assert_eq!(metrics.total_lookups(), 0);
	}

	#[test]
	fn test_hit_rate() {
		let metrics = CacheMetrics {
			hits: 3,
			misses: 1,
			..Default::default()
		};
		assert_eq!(metrics.total_lookups(), 4);
		assert!((metrics.hit_rate() - 0.75).abs() < f64::EPSILON);
	}
}
