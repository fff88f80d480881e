use std::sync::Arc;

use hashbrown::HashMap;

use crate::erased::Slot;
use crate::traits::Thing;

/// A single shard mapping full names to weak slots.
///
/// The shard is not thread-safe on its own; the cache wraps it in `RwLock`.
/// Slots whose referent was dropped stay here until a lookup observes them.
pub struct Shard {
	entries: HashMap<Box<str>, Slot>,
}

/// What a read-locked lookup found for a name.
pub(crate) enum Probe {
	/// No slot for this name.
	Vacant,
	/// A slot exists but its referent is gone.
	Reclaimed,
	/// The live thing.
	Live(Arc<dyn Thing>),
}

impl Shard {
	pub fn new(capacity: usize) -> Self {
		Self {
			entries: HashMap::with_capacity(capacity),
		}
	}

	/// Insert or replace the slot for `name`.
	///
	/// Returns true if a slot already existed (live or not).
	pub fn insert(&mut self, name: &str, slot: Slot) -> bool {
		match self.entries.get_mut(name) {
			Some(existing) => {
				*existing = slot;
				true
			}
			None => {
				self.entries.insert(Box::from(name), slot);
				false
			}
		}
	}

	/// Look up `name` without touching the map.
	pub(crate) fn probe(&self, name: &str) -> Probe {
		match self.entries.get(name) {
			None => Probe::Vacant,
			Some(slot) => match slot.upgrade() {
				Some(thing) => Probe::Live(thing),
				None => Probe::Reclaimed,
			},
		}
	}

	/// Check if `name` has a slot whose referent is still alive.
	pub fn contains_live(&self, name: &str) -> bool {
		self.entries.get(name).is_some_and(|slot| !slot.is_reclaimed())
	}

	/// Remove the slot for `name` only if its referent is gone.
	///
	/// Re-checked under the write lock so that a slot re-registered between the
	/// caller's read and write is left alone.
	pub fn remove_if_reclaimed(&mut self, name: &str) -> bool {
		if self.entries.get(name).is_some_and(Slot::is_reclaimed) {
			self.entries.remove(name);
			true
		} else {
			false
		}
	}

	/// Remove the slot for `name`, live or not.
	pub fn remove(&mut self, name: &str) -> bool {
		self.entries.remove(name).is_some()
	}

	/// Number of physical slots, including reclaimed ones.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Link(String);

	impl Thing for Link {
		fn full_name(&self) -> &str {
			&self.0
		}
	}

	fn link(name: &str) -> Arc<Link> {
		Arc::new(Link(name.to_string()))
	}

	#[test]
	fn test_shard_insert_and_probe() {
		let mut shard = Shard::new(0);
		let thing = link("t3_abc");

		assert!(!shard.insert("t3_abc", Slot::new(&thing)));
		assert_eq!(shard.len(), 1);

		match shard.probe("t3_abc") {
			Probe::Live(found) => assert_eq!(found.full_name(), "t3_abc"),
			_ => panic!("expected live slot"),
		}
		assert!(matches!(shard.probe("t3_zzz"), Probe::Vacant));
	}

	#[test]
	fn test_shard_insert_overwrites() {
		let mut shard = Shard::new(0);
		let first = link("t3_abc");
		let second = link("t3_abc");

		shard.insert("t3_abc", Slot::new(&first));
		assert!(shard.insert("t3_abc", Slot::new(&second)));
		assert_eq!(shard.len(), 1);

		match shard.probe("t3_abc") {
			Probe::Live(found) => {
				assert!(std::ptr::addr_eq(Arc::as_ptr(&found), Arc::as_ptr(&second)));
			}
			_ => panic!("expected live slot"),
		}
	}

	#[test]
	fn test_shard_probe_does_not_remove_reclaimed() {
		let mut shard = Shard::new(0);
		let thing = link("t3_abc");
		shard.insert("t3_abc", Slot::new(&thing));
		drop(thing);

		assert!(matches!(shard.probe("t3_abc"), Probe::Reclaimed));
		assert!(!shard.contains_live("t3_abc"));
		assert_eq!(shard.len(), 1);

		assert!(shard.remove_if_reclaimed("t3_abc"));
		assert_eq!(shard.len(), 0);
		assert!(!shard.remove_if_reclaimed("t3_abc"));
	}

	#[test]
	fn test_shard_remove_if_reclaimed_keeps_live() {
		let mut shard = Shard::new(0);
		let thing = link("t3_abc");
		shard.insert("t3_abc", Slot::new(&thing));

		assert!(!shard.remove_if_reclaimed("t3_abc"));
		assert!(shard.contains_live("t3_abc"));
	}

	#[test]
	fn test_shard_remove_and_clear() {
		let mut shard = Shard::new(4);
		let a = link("t3_a");
		let b = link("t3_b");
		shard.insert("t3_a", Slot::new(&a));
		shard.insert("t3_b", Slot::new(&b));

		assert!(shard.remove("t3_a"));
		assert!(!shard.remove("t3_a"));
		assert_eq!(shard.len(), 1);

		shard.clear();
		assert_eq!(shard.len(), 0);
		assert!(!shard.insert("t3_b", Slot::new(&b)));
	}
}
