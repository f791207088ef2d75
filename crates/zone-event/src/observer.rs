//! Observer registration records.

use std::sync::Arc;

/// Unique identifier for a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

impl ObserverId {
    /// Create a new observer ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Trait for event observers.
///
/// `C` is the context handed to the observer (usually the component that
/// owns the dispatcher), `E` the event. Observers run synchronously on the
/// dispatching stack and may mutate the context freely.
pub trait Observer<C, E>: Send + Sync + 'static {
    /// Handle the event.
    fn observe(&self, ctx: &mut C, event: &E);
}

// Implement Observer for closures
impl<C, E, F> Observer<C, E> for F
where
    F: Fn(&mut C, &E) + Send + Sync + 'static,
{
    fn observe(&self, ctx: &mut C, event: &E) {
        self(ctx, event);
    }
}

/// Shared observer callback.
pub type ObserverFn<C, E> = Arc<dyn Observer<C, E>>;

/// Metadata for a registered observer.
pub struct ObserverInfo<C, E> {
    /// Unique ID
    pub id: ObserverId,
    /// Event type name for debugging
    pub event_name: &'static str,
    /// The observer itself
    pub(crate) callback: ObserverFn<C, E>,
}

impl<C, E> core::fmt::Debug for ObserverInfo<C, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObserverInfo")
            .field("id", &self.id)
            .field("event_name", &self.event_name)
            .finish_non_exhaustive()
    }
}
