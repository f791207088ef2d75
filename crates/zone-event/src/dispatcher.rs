//! Registration-ordered event dispatcher.
//!
//! Dispatch is synchronous: every observer has returned before `dispatch`
//! does. The dispatcher usually lives inside the context its observers
//! mutate, so callers take a [`Snapshot`] of the observer list first and
//! dispatch from that, releasing the borrow on the dispatcher:
//!
//! ```
//! use zone_event::EventDispatcher;
//!
//! struct Scoreboard {
//!     points: u32,
//!     on_score: EventDispatcher<Scoreboard, u32>,
//! }
//!
//! let mut board = Scoreboard { points: 0, on_score: EventDispatcher::new() };
//! board.on_score.observe(|board: &mut Scoreboard, points: &u32| board.points += points);
//!
//! let snapshot = board.on_score.snapshot();
//! snapshot.dispatch(&mut board, &5);
//! assert_eq!(board.points, 5);
//! ```

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use crate::Event;
use crate::observer::{Observer, ObserverFn, ObserverId, ObserverInfo};

/// Ordered list of observers for one event type.
pub struct EventDispatcher<C, E> {
    observers: Vec<ObserverInfo<C, E>>,
    next_observer_id: u32,
}

impl<C, E> Default for EventDispatcher<C, E> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
            next_observer_id: 0,
        }
    }
}

impl<C: 'static, E: Event> EventDispatcher<C, E> {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure observer.
    pub fn observe<F>(&mut self, callback: F) -> ObserverId
    where
        F: Fn(&mut C, &E) + Send + Sync + 'static,
    {
        self.add_observer(callback)
    }

    /// Register any [`Observer`] implementation.
    ///
    /// Observers run in registration order.
    pub fn add_observer<O: Observer<C, E>>(&mut self, observer: O) -> ObserverId {
        let id = ObserverId::new(self.next_observer_id);
        self.next_observer_id += 1;

        self.observers.push(ObserverInfo {
            id,
            event_name: E::event_name(),
            callback: Arc::new(observer),
        });

        id
    }

    /// Unregister an observer. Returns `false` if the id is unknown.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|info| info.id != id);
        self.observers.len() != before
    }

    /// Copy out the current observer list.
    ///
    /// Observers added or removed after this call do not affect the snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<C, E> {
        Snapshot {
            callbacks: self
                .observers
                .iter()
                .map(|info| Arc::clone(&info.callback))
                .collect(),
        }
    }

    /// Dispatch directly, for dispatchers that do not live inside `ctx`.
    pub fn dispatch(&self, ctx: &mut C, event: &E) -> usize {
        self.snapshot().dispatch(ctx, event)
    }

    /// Registered observers, in dispatch order.
    pub fn observers(&self) -> impl Iterator<Item = &ObserverInfo<C, E>> {
        self.observers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }
}

impl<C, E> core::fmt::Debug for EventDispatcher<C, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("observers", &self.observers)
            .finish()
    }
}

/// Detached copy of a dispatcher's observer list.
pub struct Snapshot<C, E> {
    callbacks: SmallVec<[ObserverFn<C, E>; 4]>,
}

impl<C: 'static, E: Event> Snapshot<C, E> {
    /// Run every observer in order. Returns how many ran.
    pub fn dispatch(&self, ctx: &mut C, event: &E) -> usize {
        if !self.callbacks.is_empty() {
            trace!(event = E::event_name(), observers = self.callbacks.len(), "dispatch");
        }
        for callback in &self.callbacks {
            callback.observe(ctx, event);
        }
        self.callbacks.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}
