use std::any::Any;

/// A domain object identified by a stable, globally unique full name.
///
/// Things are produced by whatever decodes API responses and are owned by the
/// application through `Arc<T>`. The cache only ever holds weak handles to them.
///
/// # Example
///
/// ```
/// use thing_cache::Thing;
///
/// struct Link {
///     id: String,
///     title: String,
/// }
///
/// impl Thing for Link {
///     fn full_name(&self) -> &str {
///         &self.id
///     }
/// }
/// ```
pub trait Thing: Any + Send + Sync {
	/// The full name of this thing, e.g. `t3_abc`.
	///
	/// Must not change for the lifetime of the object. An empty name is never
	/// registered.
	fn full_name(&self) -> &str;
}
