use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;

use crate::event::error::Result;
use crate::event::types::{EventNames, Listener};
use crate::event::{EventListener, EventPayload, EventResult, ListenerResult, Priority};
use crate::kernel::component::ServiceContainer;
use crate::kernel::constants::EVENTS_DEBUG_TARGET;
use crate::storage::config::EventsConfig;

/// Listeners sharing one priority for one event, in registration order
type PriorityGroup = Vec<Arc<Listener>>;

/// Event names dispatched so far, de-duplicated, first-seen order
#[derive(Debug, Default)]
struct DispatchRecord {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl DispatchRecord {
    fn record(&mut self, event: &str) {
        if !self.seen.contains(event) {
            self.seen.insert(event.to_string());
            self.order.push(event.to_string());
        }
    }
}

//--------------------------------------------------
// EventBus
//--------------------------------------------------

/// Listener registry and synchronous, priority-ordered dispatch.
///
/// Priorities are kept in a `BTreeMap` per event, so dispatch walks them in
/// descending order without sorting. The registry only changes through
/// [`EventBus::register_listener`]; dispatch reads it.
pub struct EventBus {
    listeners: HashMap<String, BTreeMap<Priority, PriorityGroup>>,
    container: Option<Arc<ServiceContainer>>,
    config: EventsConfig,
    dispatched: Mutex<DispatchRecord>,
}

// Manual Debug implementation for EventBus
impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listener_count: usize = self.listeners.values()
            .flat_map(|groups| groups.values())
            .map(|group| group.len())
            .sum();
        f.debug_struct("EventBus")
         .field("events", &self.listeners.len())
         .field("listener_count", &listener_count)
         .field("has_container", &self.container.is_some())
         .field("config", &self.config)
         .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            container: None,
            config: EventsConfig::default(),
            dispatched: Mutex::new(DispatchRecord::default()),
        }
    }

    /// Context handed to context-aware listeners at registration
    pub fn with_container(mut self, container: Arc<ServiceContainer>) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_config(mut self, config: EventsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn container(&self) -> Option<&Arc<ServiceContainer>> {
        self.container.as_ref()
    }

    pub fn config(&self) -> &EventsConfig {
        &self.config
    }

    /// Append `listener` to the `priority` group of every event in `events`.
    ///
    /// The listener is stored once and shared between the events. A
    /// context-aware handler receives the container before it is stored.
    pub fn register_listener(&mut self, events: impl Into<EventNames>, mut listener: Listener, priority: Priority) {
        if let (Some(container), Listener::Handler(handler)) = (&self.container, &mut listener) {
            if let Some(aware) = handler.context_aware() {
                aware.set_container(Arc::clone(container));
            }
        }

        let listener = Arc::new(listener);
        for event in events.into().into_vec() {
            log::trace!("Registering listener {} on event {} at priority {}", listener.label(), event, priority);
            self.listeners
                .entry(event)
                .or_default()
                .entry(priority)
                .or_default()
                .push(Arc::clone(&listener));
        }
    }

    pub fn register_handler<L: EventListener + 'static>(&mut self, events: impl Into<EventNames>, handler: L, priority: Priority) {
        self.register_listener(events, Listener::handler(handler), priority);
    }

    pub fn register_fn<F>(&mut self, events: impl Into<EventNames>, func: F, priority: Priority)
    where
        F: Fn(Option<&EventPayload>, &str) -> ListenerResult + Send + Sync + 'static,
    {
        self.register_listener(events, Listener::function(func), priority);
    }

    /// Deliver `event` to its listeners, highest priority first.
    ///
    /// Returns [`EventResult::Stop`] when a listener stopped propagation.
    /// An event without listeners is a no-op. The first error, either an
    /// uninvocable listener or a listener's own failure, ends the dispatch;
    /// listeners that already ran are not undone.
    pub fn dispatch(&self, event: &str, data: Option<&EventPayload>) -> Result<EventResult> {
        self.record_dispatch(event);

        if self.config.debug_sent {
            log::debug!(target: EVENTS_DEBUG_TARGET, "Dispatching event {}", event);
        }

        let Some(groups) = self.listeners.get(event) else {
            return Ok(EventResult::Continue);
        };

        for (priority, group) in groups.iter().rev() {
            for listener in group {
                if self.config.debug_caught && listener.is_invocable() {
                    log::debug!(target: EVENTS_DEBUG_TARGET, "Calling listener {} on event {}.", listener.label(), event);
                }
                if listener.invoke(data, event)?.is_stop() {
                    log::trace!("Listener {} stopped propagation of {} at priority {}", listener.label(), event, priority);
                    return Ok(EventResult::Stop);
                }
            }
        }
        Ok(EventResult::Continue)
    }

    fn record_dispatch(&self, event: &str) {
        // The record is never held across a listener call, so a poisoned lock
        // still holds a consistent record.
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(event);
    }

    /// De-duplicated names of every event dispatched so far, first-seen order
    pub fn dispatched_events(&self) -> Vec<String> {
        self.dispatched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .get(event)
            .map(|groups| groups.values().map(|group| group.len()).sum())
            .unwrap_or(0)
    }

    /// Priorities registered for `event`, in dispatch (descending) order
    pub fn priorities(&self, event: &str) -> Vec<Priority> {
        self.listeners
            .get(event)
            .map(|groups| groups.keys().rev().copied().collect())
            .unwrap_or_default()
    }

    /// Names of events with at least one listener, sorted
    pub fn registered_events(&self) -> Vec<String> {
        let mut events: Vec<String> = self.listeners.keys().cloned().collect();
        events.sort();
        events
    }
}

impl Default for EventBus { fn default() -> Self { Self::new() } }


//--------------------------------------------------
// SharedEventBus (Public API)
//--------------------------------------------------

/// Thread-safe shared event bus.
///
/// Registration takes the write lock; dispatch takes the read lock and runs
/// the listeners synchronously while holding it, so registration can never
/// interleave with a dispatch in progress.
#[derive(Clone)]
pub struct SharedEventBus {
    bus: Arc<RwLock<EventBus>>,
}

// Manual Debug impl for SharedEventBus
impl fmt::Debug for SharedEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventBus").finish_non_exhaustive()
    }
}

impl SharedEventBus {
    pub fn new(bus: EventBus) -> Self { Self { bus: Arc::new(RwLock::new(bus)) } }

    pub fn clone_bus(&self) -> Arc<RwLock<EventBus>> { self.bus.clone() }

    pub async fn register_listener(&self, events: impl Into<EventNames>, listener: Listener, priority: Priority) {
        let mut bus = self.bus.write().await;
        bus.register_listener(events, listener, priority);
    }

    pub async fn dispatch(&self, event: &str, data: Option<&EventPayload>) -> Result<EventResult> {
        let bus = self.bus.read().await;
        bus.dispatch(event, data)
    }

    pub async fn dispatched_events(&self) -> Vec<String> {
        self.bus.read().await.dispatched_events()
    }

    pub async fn listener_count(&self, event: &str) -> usize {
        self.bus.read().await.listener_count(event)
    }
}

impl Default for SharedEventBus { fn default() -> Self { Self::new(EventBus::new()) } }

//--------------------------------------------------
// Helper Functions
//--------------------------------------------------

/// Create a new shared bus with no container and default options
pub fn create_bus() -> SharedEventBus { SharedEventBus::default() }

/// Helper to build a labelled function listener that never stops propagation
pub fn listener_fn<F>(label: &str, f: F) -> Listener
where F: Fn(Option<&EventPayload>, &str) + Send + Sync + 'static {
    Listener::named_function(label, move |data, event| { f(data, event); Ok(EventResult::Continue) })
}
