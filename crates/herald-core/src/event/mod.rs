//! # Herald Core Event System
//!
//! In-process event dispatch. Listeners are registered against named events
//! with an integer priority; dispatching an event invokes every matching
//! listener on the calling thread, highest priority first, registration order
//! within a priority. Any listener may end the dispatch early by returning
//! [`EventResult::Stop`].
//!
//! - [`dispatcher`]: the [`EventBus`] registry and dispatch loop, plus the
//!   lock-guarded [`SharedEventBus`].
//! - [`manager`]: the [`EventManager`] kernel component, which layers the
//!   config-driven [`dynamic`] phase after the static registry.
//! - [`types`]: the [`Listener`] value and [`EventNames`].
//! - [`error`]: [`EventSystemError`].
pub mod dispatcher;
pub mod dynamic;
pub mod error;
pub mod manager;
pub mod types;

use std::any::Any;

/// Integer ordering key; higher values run earlier within a dispatch
pub type Priority = i32;

/// Priority used when none is given
pub const DEFAULT_PRIORITY: Priority = 0;

/// Payload forwarded unchanged to every listener of a dispatch
pub type EventPayload = dyn Any + Send + Sync;

/// Error type a listener may fail with
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a listener hands back to the dispatch loop
pub type ListenerResult = Result<EventResult, BoxError>;

/// Signature of a plain function listener
pub type ListenerFn = dyn Fn(Option<&EventPayload>, &str) -> ListenerResult + Send + Sync;

/// Result of event processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    /// Event was processed and propagation should continue
    #[default]
    Continue,
    /// Event was processed and propagation should stop
    Stop,
}

impl EventResult {
    pub fn is_stop(self) -> bool {
        self == EventResult::Stop
    }
}

/// Object listener capability
pub trait EventListener: Send + Sync {
    /// Handle one dispatched event.
    ///
    /// Returning [`EventResult::Stop`] prevents every listener after this one
    /// (same or lower priority) from running for the current dispatch.
    fn process(&self, data: Option<&EventPayload>, event: &str) -> ListenerResult;

    /// Name used in debug logging
    fn label(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Listeners that need the shared [`ServiceContainer`](crate::kernel::ServiceContainer)
    /// return themselves here; the bus injects it once, at registration.
    fn context_aware(&mut self) -> Option<&mut dyn ContextAware> {
        None
    }
}

/// Plain functions and closures with the listener signature are listeners too
impl<F> EventListener for F
where
    F: Fn(Option<&EventPayload>, &str) -> ListenerResult + Send + Sync,
{
    fn process(&self, data: Option<&EventPayload>, event: &str) -> ListenerResult {
        self(data, event)
    }
}

/// Re-export important types
pub use crate::kernel::component::ContextAware;
pub use dispatcher::{EventBus, SharedEventBus, create_bus, listener_fn};
pub use dynamic::{DynamicListenerLoader, DynamicOperation, STOP_PROPAGATION};
pub use error::EventSystemError;
pub use manager::{DefaultEventManager, EventManager};
pub use types::{EventNames, Listener};

// Test module declaration
#[cfg(test)]
mod tests;
