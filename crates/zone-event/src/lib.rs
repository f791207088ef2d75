//! Zone Event - synchronous observer fan-out
//!
//! Observers are registered per event type on an [`EventDispatcher`] and run
//! in registration order, on the caller's stack, with mutable access to a
//! context value. There is no queue and no priority.
//!
//! Running synchronously is what lets an observer tear down the very object
//! whose event it is handling: the caller locks the object beforehand and
//! finishes the teardown once dispatch returns.

mod dispatcher;
mod event;
mod observer;

pub use dispatcher::{EventDispatcher, Snapshot};
pub use event::Event;
pub use observer::{Observer, ObserverFn, ObserverId, ObserverInfo};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Event, EventDispatcher, Observer, ObserverId};
}
