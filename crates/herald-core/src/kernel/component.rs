use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::event::BoxError;
use crate::event::error::EventSystemError;
use crate::kernel::error::Result;

/// Core component lifecycle trait for all kernel components
#[async_trait]
pub trait KernelComponent: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;
    async fn initialize(&self) -> Result<()>;
    async fn start(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
}

/// A named application service reachable through the [`ServiceContainer`].
///
/// Services are addressed by method name with JSON arguments so that
/// config-driven listeners can call them without compile-time knowledge.
pub trait Service: Send + Sync {
    fn call(&self, method: &str, args: &[Value]) -> std::result::Result<Value, BoxError>;
}

/// Capability of listeners that need the shared application context
pub trait ContextAware {
    fn set_container(&mut self, container: Arc<ServiceContainer>);
}

/// Shared application context handed to context-aware listeners
pub struct ServiceContainer {
    app_dir: PathBuf,
    services: HashMap<String, Arc<dyn Service>>,
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
         .field("app_dir", &self.app_dir)
         .field("services", &self.service_names())
         .finish()
    }
}

impl ServiceContainer {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            services: HashMap::new(),
        }
    }

    /// Builder-style registration
    pub fn with_service(mut self, name: impl Into<String>, service: Arc<dyn Service>) -> Self {
        self.register_service(name, service);
        self
    }

    /// Register a service, replacing any previous one under the same name
    pub fn register_service(&mut self, name: impl Into<String>, service: Arc<dyn Service>) {
        let name = name.into();
        if self.services.insert(name.clone(), service).is_some() {
            log::warn!("Service '{}' was registered twice; the previous instance is replaced", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.services.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Registered service names, sorted
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Call `method` on the named service
    pub fn call(&self, service: &str, method: &str, args: &[Value]) -> std::result::Result<Value, EventSystemError> {
        let target = self.services.get(service).ok_or_else(|| EventSystemError::ServiceNotFound {
            service: service.to_string(),
        })?;
        target.call(method, args).map_err(|e| EventSystemError::ServiceCall {
            service: service.to_string(),
            method: method.to_string(),
            reason: e.to_string(),
        })
    }
}
