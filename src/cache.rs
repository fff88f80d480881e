use std::fmt;
use std::sync::Arc;
#[cfg(feature = "metrics")]
use std::sync::atomic::AtomicU64;
use std::sync::atomic::{AtomicBool, Ordering};

use ahash::RandomState;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::erased::{Slot, downcast_thing};
#[cfg(feature = "metrics")]
use crate::metrics::CacheMetrics;
use crate::shard::{Probe, Shard};
use crate::traits::Thing;

/// Default number of lock shards.
pub(crate) const DEFAULT_SHARD_COUNT: usize = 16;

/// Upper bound on the number of lock shards; larger requests are clamped.
pub(crate) const MAX_SHARD_COUNT: usize = 1 << 16;

/// Thread-safe index of live things by full name.
///
/// The cache stores only weak handles: registering a thing never keeps it alive,
/// and once every `Arc` to it is dropped the name resolves to nothing. Share one
/// instance across the application via `Arc<ReferenceCache>`.
///
/// # Lazy Eviction
///
/// A slot whose thing has been dropped is not removed when the drop happens.
/// It stays in the map until the next [`lookup`](Self::lookup) of that exact
/// name, which notices the dead handle, removes the slot and reports a miss.
/// There is no background sweep, TTL or capacity bound. Slots for names that
/// are never looked up again are only reclaimed by [`clear`](Self::clear).
///
/// # Enabling and Disabling
///
/// While disabled, [`register`](Self::register) does nothing. Existing slots are
/// kept and remain visible to lookups; [`forget`](Self::forget) and `clear` work
/// in either mode.
///
/// # Concurrency
///
/// Names are spread over a power-of-two number of shards, each behind its own
/// `RwLock`. Every operation is atomic for the name it touches. No lock is held
/// while a thing is dropped or handed back to the caller, so a thing's `Drop`
/// impl may call back into the cache.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use thing_cache::{ReferenceCache, Thing};
///
/// struct Link(String);
///
/// impl Thing for Link {
///     fn full_name(&self) -> &str {
///         &self.0
///     }
/// }
///
/// let cache = ReferenceCache::new();
/// let link = Arc::new(Link("t3_abc".to_string()));
///
/// cache.register(&link);
/// assert!(cache.lookup_as::<Link>("t3_abc").is_some());
///
/// drop(link);
/// assert!(cache.lookup("t3_abc").is_none());
/// ```
pub struct ReferenceCache {
	/// Sharded storage
	shards: Vec<RwLock<Shard>>,
	/// Number of shards (power of two)
	shard_count: usize,
	/// Picks the shard for a name
	hasher: RandomState,
	/// Whether `register` takes effect
	enabled: AtomicBool,
	#[cfg(feature = "metrics")]
	hits: AtomicU64,
	#[cfg(feature = "metrics")]
	misses: AtomicU64,
	#[cfg(feature = "metrics")]
	registrations: AtomicU64,
	#[cfg(feature = "metrics")]
	overwrites: AtomicU64,
	#[cfg(feature = "metrics")]
	skipped: AtomicU64,
	#[cfg(feature = "metrics")]
	reclaimed: AtomicU64,
	#[cfg(feature = "metrics")]
	removals: AtomicU64,
}

impl ReferenceCache {
	/// Create an enabled cache with the default shard count.
	pub fn new() -> Self {
		Self::with_config(DEFAULT_SHARD_COUNT, 0, true)
	}

	/// Create an enabled cache with a custom shard count.
	///
	/// The count is rounded up to the next power of two and clamped to
	/// 65536 shards.
	pub fn with_shards(shard_count: usize) -> Self {
		Self::with_config(shard_count, 0, true)
	}

	/// Create with full custom configuration.
	///
	/// This is primarily used by `CacheBuilder`.
	pub(crate) fn with_config(shard_count: usize, capacity: usize, enabled: bool) -> Self {
		let shard_count = shard_count.clamp(1, MAX_SHARD_COUNT).next_power_of_two();
		let capacity_per_shard = capacity.div_ceil(shard_count);

		let shards =
			(0..shard_count).map(|_| RwLock::new(Shard::new(capacity_per_shard))).collect();

		Self {
			shards,
			shard_count,
			hasher: RandomState::new(),
			enabled: AtomicBool::new(enabled),
			#[cfg(feature = "metrics")]
			hits: AtomicU64::new(0),
			#[cfg(feature = "metrics")]
			misses: AtomicU64::new(0),
			#[cfg(feature = "metrics")]
			registrations: AtomicU64::new(0),
			#[cfg(feature = "metrics")]
			overwrites: AtomicU64::new(0),
			#[cfg(feature = "metrics")]
			skipped: AtomicU64::new(0),
			#[cfg(feature = "metrics")]
			reclaimed: AtomicU64::new(0),
			#[cfg(feature = "metrics")]
			removals: AtomicU64::new(0),
		}
	}

	/// Remember `thing` under its full name.
	///
	/// Does nothing while the cache is disabled or if the name is empty.
	/// A previous slot for the same name is replaced: the last registration wins.
	pub fn register<T: Thing>(&self, thing: &Arc<T>) {
		self.insert_slot(thing.full_name(), || Slot::new(thing));
	}

	/// Like [`register`](Self::register), for things already erased to `dyn Thing`.
	pub fn register_dyn(&self, thing: &Arc<dyn Thing>) {
		self.insert_slot(thing.full_name(), || Slot::from_dyn(thing));
	}

	fn insert_slot(&self, name: &str, slot: impl FnOnce() -> Slot) {
		if name.is_empty() {
			trace!("skipping registration of thing without a full name");
			return;
		}
		if !self.is_enabled() {
			trace!(name, "reference cache disabled, skipping registration");
			#[cfg(feature = "metrics")]
			self.skipped.fetch_add(1, Ordering::Relaxed);
			return;
		}

		let _replaced = self.get_shard(name).write().insert(name, slot());

		#[cfg(feature = "metrics")]
		{
			let counter = if _replaced { &self.overwrites } else { &self.registrations };
			counter.fetch_add(1, Ordering::Relaxed);
		}
	}

	/// Recover the thing registered under `name`, if it is still alive.
	///
	/// If the slot exists but its thing has been dropped, the slot is removed
	/// and `None` is returned. A live slot is left in place.
	pub fn lookup(&self, name: &str) -> Option<Arc<dyn Thing>> {
		let found = self.resolve(name);
		self.record_lookup(found.is_some());
		found
	}

	/// Typed [`lookup`](Self::lookup).
	///
	/// Returns `None` if the live thing under `name` is not a `T`; that slot is
	/// left untouched.
	pub fn lookup_as<T: Thing>(&self, name: &str) -> Option<Arc<T>> {
		let found = self.resolve(name).and_then(downcast_thing::<T>);
		self.record_lookup(found.is_some());
		found
	}

	fn resolve(&self, name: &str) -> Option<Arc<dyn Thing>> {
		let shard_lock = self.get_shard(name);

		let probe = shard_lock.read().probe(name);

		match probe {
			Probe::Live(thing) => Some(thing),
			Probe::Vacant => None,
			Probe::Reclaimed => {
				// The slot may have been replaced since the read lock was released;
				// only a still-dead slot is removed.
				if shard_lock.write().remove_if_reclaimed(name) {
					trace!(name, "evicted reclaimed slot");
					#[cfg(feature = "metrics")]
					self.reclaimed.fetch_add(1, Ordering::Relaxed);
				}
				None
			}
		}
	}

	#[inline]
	fn record_lookup(&self, _hit: bool) {
		#[cfg(feature = "metrics")]
		{
			let counter = if _hit { &self.hits } else { &self.misses };
			counter.fetch_add(1, Ordering::Relaxed);
		}
	}

	/// Drop the slot for `thing`'s full name, if any.
	///
	/// Works whether or not the cache is enabled. Never affects `thing` itself.
	pub fn forget<T: Thing + ?Sized>(&self, thing: &T) {
		self.forget_name(thing.full_name());
	}

	/// Drop the slot for `name`, if any.
	pub fn forget_name(&self, name: &str) {
		let _removed = self.get_shard(name).write().remove(name);

		#[cfg(feature = "metrics")]
		{
			self.removals.fetch_add(u64::from(_removed), Ordering::Relaxed);
		}
	}

	/// Check if `name` resolves to a live thing.
	///
	/// Unlike `lookup`, never removes a reclaimed slot.
	pub fn contains(&self, name: &str) -> bool {
		self.get_shard(name).read().contains_live(name)
	}

	/// Remove every slot.
	pub fn clear(&self) {
		for shard_lock in &self.shards {
			shard_lock.write().clear();
		}
		debug!("reference cache cleared");
	}

	/// Turn registration on or off.
	///
	/// Turning it off does not clear existing slots.
	pub fn set_enabled(&self, enabled: bool) {
		let previous = self.enabled.swap(enabled, Ordering::AcqRel);
		if previous != enabled {
			debug!(enabled, "reference cache toggled");
		}
	}

	/// Whether `register` currently takes effect.
	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Acquire)
	}

	/// Number of physical slots, including ones whose thing has been dropped
	/// but that no lookup has observed yet.
	pub fn slot_count(&self) -> usize {
		self.shards.iter().map(|shard| shard.read().len()).sum()
	}

	/// Check if the cache holds no slots at all.
	pub fn is_empty(&self) -> bool {
		self.slot_count() == 0
	}

	/// Number of lock shards.
	pub fn shard_count(&self) -> usize {
		self.shard_count
	}

	/// Snapshot of the cache counters.
	#[cfg(feature = "metrics")]
	pub fn metrics(&self) -> CacheMetrics {
		CacheMetrics {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			registrations: self.registrations.load(Ordering::Relaxed),
			overwrites: self.overwrites.load(Ordering::Relaxed),
			skipped: self.skipped.load(Ordering::Relaxed),
			reclaimed: self.reclaimed.load(Ordering::Relaxed),
			removals: self.removals.load(Ordering::Relaxed),
			slot_count: self.slot_count(),
		}
	}

	/// Get the shard for a given name.
	fn get_shard(&self, name: &str) -> &RwLock<Shard> {
		let index = (self.hasher.hash_one(name) as usize) & (self.shard_count - 1);
		&self.shards[index]
	}
}

impl Default for ReferenceCache {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ReferenceCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ReferenceCache")
			.field("enabled", &self.is_enabled())
			.field("shard_count", &self.shard_count)
			.field("slot_count", &self.slot_count())
			.finish()
	}
}
