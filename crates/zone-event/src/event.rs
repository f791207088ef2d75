//! Event marker trait.

/// Marker trait for dispatchable events.
///
/// Any `Send + Sync + 'static` type qualifies.
pub trait Event: Send + Sync + 'static {
    /// Event type name for debugging.
    fn event_name() -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<T: Send + Sync + 'static> Event for T {}
