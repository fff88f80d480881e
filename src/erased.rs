use std::any::Any;
use std::sync::{Arc, Weak};

use crate::traits::Thing;

/// Type-erased weak handle to a registered thing.
///
/// Holding a `Slot` never keeps the thing alive. Once the last `Arc` is dropped
/// the slot is permanently reclaimed; it cannot be upgraded again.
pub(crate) struct Slot {
	handle: Weak<dyn Thing>,
}

impl Slot {
	/// Create a slot pointing at `thing` without taking a strong reference.
	pub fn new<T: Thing>(thing: &Arc<T>) -> Self {
		let handle: Weak<T> = Arc::downgrade(thing);
		Self {
			handle,
		}
	}

	/// Create a slot for a thing that is already type-erased.
	pub fn from_dyn(thing: &Arc<dyn Thing>) -> Self {
		Self {
			handle: Arc::downgrade(thing),
		}
	}

	/// Recover the thing if it is still alive.
	pub fn upgrade(&self) -> Option<Arc<dyn Thing>> {
		self.handle.upgrade()
	}

	/// True once the referent has been dropped.
	///
	/// Does not upgrade, so it never extends the referent's lifetime and never
	/// runs its destructor.
	pub fn is_reclaimed(&self) -> bool {
		self.handle.strong_count() == 0
	}

	/// True if both slots point at the same allocation.
	#[cfg(test)]
	pub fn same_referent(&self, other: &Slot) -> bool {
		Weak::ptr_eq(&self.handle, &other.handle)
	}
}

/// Downcast an upgraded thing to its concrete type.
///
/// Returns `None` if the thing is of another type.
pub(crate) fn downcast_thing<T: Thing>(thing: Arc<dyn Thing>) -> Option<Arc<T>> {
	let any: Arc<dyn Any + Send + Sync> = thing;
	any.downcast::<T>().ok()
}
