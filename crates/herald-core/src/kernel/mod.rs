//! # Herald Core Kernel
//!
//! The `kernel` module wires the event system into an application.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Application Bootstrapping**: [`Application`](bootstrap::Application) and its
//!   builder load the events configuration, build the shared
//!   [`ServiceContainer`](component::ServiceContainer) and the event manager.
//! - **Component Lifecycle**: the [`KernelComponent`](component::KernelComponent) trait,
//!   driven in order on start and in reverse order on shutdown.
//! - **Shared Context**: [`Service`](component::Service) and
//!   [`ContextAware`](component::ContextAware), the seam through which listeners
//!   reach application services.
//! - **Core Constants** and **Error Handling** ([`Error`](error::Error), `Result`).
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;

pub use bootstrap::{Application, ApplicationBuilder};
pub use component::{ContextAware, KernelComponent, Service, ServiceContainer};
pub use error::{Error, Result};
