use std::sync::Arc;
use async_trait::async_trait;

use crate::event::dispatcher::SharedEventBus;
use crate::event::dynamic::DynamicListenerLoader;
use crate::event::error::Result as EventSystemResult;
use crate::event::types::{EventNames, Listener};
use crate::event::{EventPayload, EventResult, Priority};
use crate::kernel::component::KernelComponent;
use crate::kernel::error::Result; // Keep for KernelComponent trait methods

/// Event manager interface
#[async_trait]
pub trait EventManager: KernelComponent + Send + Sync {
    /// Register a listener for one or more event names
    async fn register_listener(&self, events: EventNames, listener: Listener, priority: Priority);

    /// Dispatch an event: static listeners first, then dynamic ones
    async fn dispatch(&self, event: &str, data: Option<&EventPayload>) -> EventSystemResult<EventResult>;

    /// Event names dispatched so far, de-duplicated
    async fn dispatched_events(&self) -> Vec<String>;
}

/// Default implementation of EventManager
#[derive(Clone, Debug)]
pub struct DefaultEventManager {
    name: &'static str,
    bus: SharedEventBus,
    dynamic: Option<Arc<DynamicListenerLoader>>,
}

impl DefaultEventManager {
    /// Create a manager over an empty bus with no dynamic phase
    pub fn new() -> Self {
        Self::with_bus(SharedEventBus::default(), None)
    }

    pub fn with_bus(bus: SharedEventBus, dynamic: Option<DynamicListenerLoader>) -> Self {
        Self {
            name: "DefaultEventManager",
            bus,
            dynamic: dynamic.map(Arc::new),
        }
    }

    /// Get a reference to the underlying shared bus
    pub fn bus(&self) -> &SharedEventBus {
        &self.bus
    }

    pub fn dynamic_loader(&self) -> Option<&DynamicListenerLoader> {
        self.dynamic.as_deref()
    }

    /// Register a listener at the default priority (Concrete Impl)
    pub async fn register(&self, events: impl Into<EventNames>, listener: Listener) {
        self.bus.register_listener(events, listener, crate::event::DEFAULT_PRIORITY).await
    }
}

#[async_trait]
impl KernelComponent for DefaultEventManager {
    fn name(&self) -> &'static str { self.name }

    async fn initialize(&self) -> Result<()> {
        if let Some(loader) = &self.dynamic {
            log::info!("Dynamic listeners are read from {}", loader.root().display());
        }
        Ok(())
    }

    async fn start(&self) -> Result<()> { Ok(()) }

    async fn stop(&self) -> Result<()> {
        log::info!("Event manager stopping after {} distinct events", self.bus.dispatched_events().await.len());
        Ok(())
    }
}

#[async_trait]
impl EventManager for DefaultEventManager {
    async fn register_listener(&self, events: EventNames, listener: Listener, priority: Priority) {
        self.bus.register_listener(events, listener, priority).await
    }

    async fn dispatch(&self, event: &str, data: Option<&EventPayload>) -> EventSystemResult<EventResult> {
        if self.bus.dispatch(event, data).await?.is_stop() {
            // A stopped static phase skips the dynamic one as well
            return Ok(EventResult::Stop);
        }
        match &self.dynamic {
            Some(loader) => loader.dispatch(event, data),
            None => Ok(EventResult::Continue),
        }
    }

    async fn dispatched_events(&self) -> Vec<String> {
        self.bus.dispatched_events().await
    }
}

impl Default for DefaultEventManager {
    fn default() -> Self {
        Self::new()
    }
}
