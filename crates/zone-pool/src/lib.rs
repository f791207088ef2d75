//! Zone Pool - stable handles over fixed storage
//!
//! # Key Concepts
//!
//! - **Handle**: slot index of a live entry, stable until the entry is freed
//! - **Lock**: reentrancy guard that parks a release until the last unlock
//! - **Active set**: handles opted into per-tick work, separate from occupancy
//!
//! # Example
//!
//! ```
//! use zone_pool::{Pool, Release};
//!
//! let mut pool = Pool::<&str, 4>::new();
//! let handle = pool.create("spawn").unwrap();
//!
//! pool.lock(handle);
//! assert_eq!(pool.release(handle), Release::Deferred);
//! assert!(pool.get(handle).is_some());
//!
//! assert!(pool.unlock(handle));
//! assert!(pool.get(handle).is_none());
//! ```

mod active;
mod handle;
mod pool;

pub use active::{ActiveSet, ActiveSnapshot};
pub use handle::{SlotId, ZoneHandle};
pub use pool::{Pool, Release};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ActiveSet, Pool, Release, ZoneHandle};
}
