//! Zone Ids - per-player id virtualization
//!
//! The wire protocol addresses objects with a narrow per-player numbering,
//! distinct from the server's own handle space. An [`IdTable`] maps between
//! the two for one player.
//!
//! ```
//! use zone_ids::IdTable;
//!
//! let mut table = IdTable::<16>::new();
//! let client_id = table.reserve_global(700).unwrap();
//! assert_eq!(table.global_at(client_id), Some(700));
//! assert_eq!(table.release_global(700), Some(client_id));
//! ```

mod table;

pub use table::{IdTable, RawId, SlotIndex, Track};
