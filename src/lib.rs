//! # Thing Cache
//!
//! A concurrent, name-indexed cache of *weak* references to live API objects.
//!
//! - **Never keeps anything alive**: slots are `Weak` handles; the application owns
//!   every object through `Arc`
//! - **Same object back**: a lookup returns the very allocation that was registered
//! - **Lazy eviction**: a slot whose object was dropped is removed the next time
//!   its name is looked up, and never earlier
//! - **Heterogeneous storage**: links, comments and subreddits share one cache and
//!   are recovered by concrete type with `lookup_as`
//! - **Runtime toggle**: registration can be switched off without losing
//!   existing slots
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use thing_cache::{ReferenceCache, Thing};
//!
//! struct Link {
//!     name: String,
//!     title: String,
//! }
//!
//! impl Thing for Link {
//!     fn full_name(&self) -> &str {
//!         &self.name
//!     }
//! }
//!
//! let cache = ReferenceCache::new();
//!
//! // After decoding a response
//! let link = Arc::new(Link {
//!     name: "t3_abc".to_string(),
//!     title: "Hello".to_string(),
//! });
//! cache.register(&link);
//!
//! // Anywhere that only has the name
//! if let Some(found) = cache.lookup_as::<Link>("t3_abc") {
//!     assert!(Arc::ptr_eq(&found, &link));
//! }
//!
//! // Once the application lets go, the name no longer resolves
//! drop(link);
//! assert!(cache.lookup("t3_abc").is_none());
//! ```
//!
//! ## Fetch Fallback
//!
//! A miss means the caller must acquire the object the normal way and should
//! register the fresh copy:
//!
//! ```rust,ignore
//! let link = match cache.lookup_as::<Link>(name) {
//!     Some(link) => link,
//!     None => {
//!         let link = Arc::new(client.fetch_link(name).await?);
//!         cache.register(&link);
//!         link
//!     }
//! };
//! ```
//!
//! ## Thread Safety
//!
//! The cache is `Send + Sync` and is meant to be constructed once and shared via
//! `Arc`. Separate sessions may each own their own cache.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ReferenceCache::new());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let cache = cache.clone();
//!         thread::spawn(move || cache.lookup("t3_abc").is_some())
//!     })
//!     .collect();
//! ```

mod builder;
mod cache;
mod erased;
#[cfg(feature = "metrics")]
mod metrics;
mod shard;
mod traits;

pub use builder::CacheBuilder;
pub use cache::ReferenceCache;
#[cfg(feature = "metrics")]
pub use metrics::CacheMetrics;
pub use traits::Thing;
