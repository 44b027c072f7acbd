//! Herald: in-process, priority-ordered event dispatch.
pub mod event;
pub mod kernel;
pub mod storage;
pub mod utils;

// Re-export key public types/traits for easier use by the binary and embedders
pub use kernel::Application;
pub use kernel::error::Error as KernelError;
pub use kernel::{ContextAware, Service, ServiceContainer};
pub use event::{
    EventBus, EventListener, EventManager, EventNames, EventPayload, EventResult,
    EventSystemError, Listener, SharedEventBus, DefaultEventManager, Priority,
};
pub use storage::EventsConfig;
