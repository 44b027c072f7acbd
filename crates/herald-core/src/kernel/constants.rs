/// Application name
pub const APP_NAME: &str = "Herald";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log target of the dispatch diagnostics
pub const EVENTS_DEBUG_TARGET: &str = "events.debug";

/// Default location of dynamic listener definitions, relative to the application directory
pub const DYNAMIC_EVENTS_DIR: &str = "config/dynamic/events";

/// Return value of a dynamic operation that ends the dynamic phase
pub const STOP_PROPAGATION: &str = "_stop_propagation_";
